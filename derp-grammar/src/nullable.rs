use crate::node::{Grammar, Node, NodeId, Nullability};
use crate::{Alphabet, GrammarError};

#[derive(Clone, Copy)]
enum Op {
    Cat,
    Alt,
}

impl<T: Alphabet> Grammar<T> {
    /// Returns whether the language of `id` contains the empty sequence.
    ///
    /// Works on cyclic grammars. A node whose nullability only depends on itself
    /// (like `S = S S | S 'x'`) has no finite derivation of the empty sequence and
    /// is not nullable.
    ///
    /// # Panics
    ///
    /// Panics if `id` was created by another grammar.
    pub fn nullable(&mut self, id: NodeId) -> Result<bool, GrammarError> {
        match self.nodes[id.0].nullability {
            Nullability::Resolved(value) => return Ok(value),
            Nullability::InProgress | Nullability::Provisional => {
                return Err(GrammarError::UnresolvableNullability(id))
            }
            Nullability::Unknown => {}
        }

        let mut provisional = Vec::new();
        let result = self.peek_nullable(id, &mut provisional);
        // provisional answers only hold within one query
        for node in provisional {
            if self.nodes[node.0].nullability == Nullability::Provisional {
                self.nodes[node.0].nullability = Nullability::Unknown;
            }
        }

        match result? {
            Some(value) => Ok(value),
            None => {
                log::debug!("{id} only depends on itself, so it is not nullable");
                self.nodes[id.0].nullability = Nullability::Resolved(false);
                Ok(false)
            }
        }
    }

    /// Three-valued nullability: `None` means "depends on a node that is still being
    /// computed". Definite answers are cached for good. Undecided ones are kept in
    /// `provisional` until a node they may depend on gets a definite answer.
    fn peek_nullable(
        &mut self,
        id: NodeId,
        provisional: &mut Vec<NodeId>,
    ) -> Result<Option<bool>, GrammarError> {
        match self.nodes[id.0].nullability {
            Nullability::Resolved(value) => return Ok(Some(value)),
            Nullability::InProgress | Nullability::Provisional => return Ok(None),
            Nullability::Unknown => {}
        }

        let (op, l, r) = match self.node(id) {
            Node::Unbound => return Err(GrammarError::MalformedGrammar(id)),
            Node::Terminal(token) => {
                let value = token.is_nullable();
                self.nodes[id.0].nullability = Nullability::Resolved(value);
                return Ok(Some(value));
            }
            Node::Cat(l, r) => (Op::Cat, *l, *r),
            Node::Alt(l, r) => (Op::Alt, *l, *r),
        };

        self.nodes[id.0].nullability = Nullability::InProgress;
        let mark = provisional.len();
        let result = self.combine(op, l, r, provisional);

        let slot = match result {
            Ok(Some(value)) => {
                // undecided answers found below this node may have been waiting on it
                for node in provisional.drain(mark..) {
                    self.nodes[node.0].nullability = Nullability::Unknown;
                }
                Nullability::Resolved(value)
            }
            Ok(None) => {
                provisional.push(id);
                Nullability::Provisional
            }
            Err(_) => Nullability::Unknown,
        };
        self.nodes[id.0].nullability = slot;

        log::trace!("nullable({id}) = {result:?}");
        result
    }

    fn combine(
        &mut self,
        op: Op,
        l: NodeId,
        r: NodeId,
        provisional: &mut Vec<NodeId>,
    ) -> Result<Option<bool>, GrammarError> {
        let left = self.peek_nullable(l, provisional)?;
        Ok(match op {
            Op::Cat => {
                if left == Some(false) {
                    return Ok(Some(false));
                }
                match (left, self.peek_nullable(r, provisional)?) {
                    (_, Some(false)) => Some(false),
                    (Some(true), Some(true)) => Some(true),
                    _ => None,
                }
            }
            Op::Alt => {
                if left == Some(true) {
                    return Ok(Some(true));
                }
                match (left, self.peek_nullable(r, provisional)?) {
                    (_, Some(true)) => Some(true),
                    (Some(false), Some(false)) => Some(false),
                    _ => None,
                }
            }
        })
    }
}
