use crate::token::Token;
use crate::{Alphabet, GrammarError};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

/// Handle to a node in a [`Grammar`].
///
/// Node identity is handle identity: two handles are the same node iff they are equal.
/// Handles are only meaningful for the grammar that created them, and the grammar
/// methods taking a foreign handle may panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the grammar graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<T> {
    /// Matches exactly the one-token sequence of its token.
    /// The sentinels stand for the empty-string and empty languages.
    Terminal(Token<T>),
    /// Concatenation.
    Cat(NodeId, NodeId),
    /// Union.
    Alt(NodeId, NodeId),
    /// A placeholder that will be bound exactly once.
    Unbound,
}

impl<T> Node<T> {
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Node::Cat(l, r) | Node::Alt(l, r) => Some((*l, *r)),
            Node::Terminal(_) | Node::Unbound => None,
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Node::Unbound)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Nullability {
    #[default]
    Unknown,
    InProgress,
    /// Undecided within the running query, because it depends on a node still in progress
    Provisional,
    Resolved(bool),
}

#[derive(Debug)]
pub(crate) struct NodeData<T> {
    pub(crate) node: Node<T>,
    pub(crate) derivatives: HashMap<T, NodeId>,
    pub(crate) nullability: Nullability,
}

impl<T> NodeData<T> {
    fn new(node: Node<T>) -> Self {
        Self {
            node,
            derivatives: HashMap::new(),
            nullability: Nullability::Unknown,
        }
    }
}

/// An arena of grammar nodes.
///
/// All nodes of a grammar, including the ones created while matching, live here and
/// are freed together when the grammar is dropped. Nodes are immutable after construction,
/// except that a placeholder is bound once and that derivative and nullability caches
/// fill up as the grammar is queried.
#[derive(Debug)]
pub struct Grammar<T> {
    pub(crate) nodes: Vec<NodeData<T>>,
    terminals: HashMap<T, NodeId>,
    epsilon: NodeId,
    null: NodeId,
}

impl<T: Alphabet> Default for Grammar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Alphabet> Grammar<T> {
    pub fn new() -> Self {
        let mut grammar = Self {
            nodes: Vec::new(),
            terminals: HashMap::new(),
            epsilon: NodeId(0),
            null: NodeId(0),
        };
        grammar.epsilon = grammar.push(Node::Terminal(Token::Epsilon));
        grammar.null = grammar.push(Node::Terminal(Token::Null));
        grammar
    }

    /// The language containing only the empty sequence.
    pub fn epsilon(&self) -> NodeId {
        self.epsilon
    }

    /// The empty language.
    pub fn null(&self) -> NodeId {
        self.null
    }

    /// The terminal matching `value`. Terminals are interned: asking twice for the same value
    /// gives the same node.
    pub fn terminal(&mut self, value: T) -> NodeId {
        if let Some(&id) = self.terminals.get(&value) {
            return id;
        }
        let id = self.push(Node::Terminal(Token::Value(value.clone())));
        self.terminals.insert(value, id);
        id
    }

    pub fn token(&mut self, token: Token<T>) -> NodeId {
        match token {
            Token::Epsilon => self.epsilon,
            Token::Null => self.null,
            Token::Value(value) => self.terminal(value),
        }
    }

    /// Allocates a placeholder, to be bound later with [`Grammar::bind`].
    ///
    /// Placeholders can be referenced before they are bound, which is how recursive
    /// rules are written:
    ///
    /// ```
    /// # use derp_grammar::Grammar;
    /// let mut g = Grammar::new();
    /// let s = g.placeholder();
    /// let x = g.terminal('x');
    /// let sx = g.concat(s, x);
    /// let eps = g.epsilon();
    /// let def = g.union(sx, eps);
    /// g.bind(s, def).unwrap();
    ///
    /// assert!(g.matches(s, "xxx".chars()).unwrap());
    /// ```
    pub fn placeholder(&mut self) -> NodeId {
        self.push(Node::Unbound)
    }

    /// Binds `placeholder` to the language of `definition`.
    ///
    /// Fails if `placeholder` is not an unbound placeholder.
    ///
    /// # Panics
    ///
    /// Panics if either handle was created by another grammar.
    pub fn bind(&mut self, placeholder: NodeId, definition: NodeId) -> Result<(), GrammarError> {
        if !self.node(placeholder).is_unbound() {
            return Err(GrammarError::InvalidRebinding(placeholder));
        }
        self.assign(placeholder, definition);
        Ok(())
    }

    /// The node behind the handle `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was created by another grammar.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0].node
    }

    /// Number of nodes allocated so far, including the ones created by matching.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `id` denotes the empty language.
    pub fn is_null(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::Terminal(token) if token.is_null())
    }

    /// Whether `id` denotes the language of the empty sequence.
    pub fn is_epsilon(&self, id: NodeId) -> bool {
        matches!(self.node(id), Node::Terminal(token) if token.is_epsilon())
    }

    /// Returns the first unbound placeholder reachable from `root`.
    pub fn validate(&self, root: NodeId) -> Result<(), GrammarError> {
        let mut visited = HashSet::new();
        let mut work_list = vec![root];

        while let Some(id) = work_list.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.node(id) {
                Node::Unbound => return Err(GrammarError::MalformedGrammar(id)),
                Node::Terminal(_) => {}
                Node::Cat(l, r) | Node::Alt(l, r) => {
                    work_list.push(*r);
                    work_list.push(*l);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(node));
        id
    }

    pub(crate) fn set_node(&mut self, id: NodeId, node: Node<T>) {
        self.nodes[id.0].node = node;
    }

    /// If `id` only forwards to another node (a placeholder that was bound to a placeholder),
    /// returns that node.
    pub(crate) fn forwarded(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id) {
            Node::Alt(target, rest) if *rest == self.null => Some(*target),
            _ => None,
        }
    }

    /// Makes the placeholder `target` denote the language of `source`.
    ///
    /// The variant of `source` is copied into `target`. When `source` is itself still unbound,
    /// `target` forwards to it instead, and a placeholder that is defined as itself denotes
    /// the empty language.
    pub(crate) fn assign(&mut self, target: NodeId, source: NodeId) {
        let node = if target == source {
            log::debug!("{target} is defined as itself, binding it to the empty language");
            Node::Terminal(Token::Null)
        } else {
            match self.node(source) {
                Node::Unbound => Node::Alt(source, self.null),
                other => other.clone(),
            }
        };

        let is_cat = matches!(node, Node::Cat(..));
        self.set_node(target, node);
        if is_cat {
            self.fold_left(target);
        }
    }
}
