use crate::node::{Grammar, Node, NodeId};
use crate::token::Token;
use crate::Alphabet;

impl<T: Alphabet> Grammar<T> {
    /// Concatenation of two languages.
    ///
    /// * 0 a => 0, a 0 => 0
    /// * e a => a, a e => a
    /// * (a b) c => a (b c)
    pub fn concat(&mut self, left: NodeId, right: NodeId) -> NodeId {
        if self.is_null(left) || self.is_null(right) {
            return self.null();
        }
        if self.is_epsilon(left) {
            return right;
        }
        if self.is_epsilon(right) {
            return left;
        }

        let id = self.push(Node::Cat(left, right));
        self.fold_left(id);
        id
    }

    /// Union of two languages.
    ///
    /// * 0 | a => a, a | 0 => a
    /// * a | a => a
    pub fn union(&mut self, left: NodeId, right: NodeId) -> NodeId {
        if self.is_null(left) {
            return right;
        }
        if self.is_null(right) {
            return left;
        }
        if left == right || self.same_terminal(left, right) {
            return left;
        }
        self.push(Node::Alt(left, right))
    }

    /// Zero or more repetitions of `inner`.
    pub fn star(&mut self, inner: NodeId) -> NodeId {
        self.star_plus(inner).0
    }

    /// One or more repetitions of `inner`.
    pub fn plus(&mut self, inner: NodeId) -> NodeId {
        self.star_plus(inner).1
    }

    /// Builds the pair `star = e | plus`, `plus = inner star`, which refer to each other.
    pub fn star_plus(&mut self, inner: NodeId) -> (NodeId, NodeId) {
        let star = self.placeholder();
        let plus = self.concat(inner, star);
        let epsilon = self.epsilon();
        let definition = self.union(epsilon, plus);
        self.assign(star, definition);
        (star, plus)
    }

    /// Zero or one occurrence of `inner`.
    pub fn optional(&mut self, inner: NodeId) -> NodeId {
        let epsilon = self.epsilon();
        self.union(epsilon, inner)
    }

    /// The concatenation of the terminals for `values`, in order.
    pub fn sequence(&mut self, values: impl IntoIterator<Item = T>) -> NodeId {
        let terminals: Vec<_> = values.into_iter().map(|v| self.terminal(v)).collect();
        let epsilon = self.epsilon();
        terminals
            .into_iter()
            .rev()
            .fold(epsilon, |rest, t| self.concat(t, rest))
    }

    /// The union of all `alternatives`.
    pub fn choice(&mut self, alternatives: impl IntoIterator<Item = NodeId>) -> NodeId {
        let null = self.null();
        alternatives
            .into_iter()
            .fold(null, |acc, alt| self.union(acc, alt))
    }

    fn same_terminal(&self, left: NodeId, right: NodeId) -> bool {
        match (self.node(left), self.node(right)) {
            (Node::Terminal(a), Node::Terminal(b)) => a == b,
            _ => false,
        }
    }

    /// Brings the concatenation at `id` into right-associated form.
    ///
    /// Walks down the left spine, unwrapping forwarding nodes and rotating
    /// `(a b) c` into `a (b c)`. If the spine comes back to a node it already passed,
    /// the concatenation is left-recursive without ever consuming a token, so it
    /// matches nothing and `id` becomes the empty language.
    pub(crate) fn fold_left(&mut self, id: NodeId) {
        let (mut left, mut right) = match self.node(id) {
            Node::Cat(l, r) => (*l, *r),
            _ => return,
        };
        let mut seen = vec![id];

        loop {
            if let Some(target) = self.forwarded(left) {
                if seen.contains(&left) {
                    return self.collapse(id);
                }
                seen.push(left);
                left = target;
                continue;
            }

            let (inner_left, inner_right) = match self.node(left) {
                Node::Cat(l, r) => (*l, *r),
                _ => break,
            };
            if seen.contains(&left) {
                return self.collapse(id);
            }
            seen.push(left);
            right = self.join(inner_right, right);
            left = inner_left;
        }

        if self.is_null(left) || self.is_null(right) {
            self.set_node(id, Node::Terminal(Token::Null));
        } else if self.is_epsilon(left) {
            self.assign(id, right);
        } else {
            self.set_node(id, Node::Cat(left, right));
        }
    }

    /// Like [`Grammar::concat`], but leaves the spine of `left` as it is.
    /// Only the outermost spine of a concatenation is kept in canonical form.
    fn join(&mut self, left: NodeId, right: NodeId) -> NodeId {
        if self.is_null(left) || self.is_null(right) {
            self.null()
        } else if self.is_epsilon(left) {
            right
        } else if self.is_epsilon(right) {
            left
        } else {
            self.push(Node::Cat(left, right))
        }
    }

    fn collapse(&mut self, id: NodeId) {
        log::debug!("infinite left recursion through {id}, it can not match anything");
        self.set_node(id, Node::Terminal(Token::Null));
    }
}
