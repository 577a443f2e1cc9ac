use crate::node::{Grammar, Node, NodeId};
use crate::{Alphabet, GrammarError};

impl<T: Alphabet> Grammar<T> {
    /// Applies a token to the language of `id`. The result is a node that matches
    /// everything that may follow `value` in a sentence of `id`.
    /// Like from state `a b a b`, if we see an `a`, we go to state `b a b`.
    ///
    /// Results are cached per node and token, and nodes are never derived
    /// twice with respect to the same token.
    ///
    /// # Panics
    ///
    /// Panics if `id` was created by another grammar.
    pub fn derive(&mut self, id: NodeId, value: &T) -> Result<NodeId, GrammarError> {
        let (op, l, r) = match self.node(id) {
            Node::Unbound => return Err(GrammarError::MalformedGrammar(id)),
            // a: a => e
            // a: b => 0
            Node::Terminal(token) => {
                let token = token.derive(value);
                return Ok(self.token(token));
            }
            Node::Cat(l, r) => (Op::Cat, *l, *r),
            Node::Alt(l, r) => (Op::Alt, *l, *r),
        };

        if let Some(&cached) = self.nodes[id.0].derivatives.get(value) {
            log::trace!("reuse d/{value:?} {id} = {cached}");
            return Ok(cached);
        }

        // A recursive rule may ask for this derivative again before it is known.
        // It gets the pending node, which is bound to the result below.
        let pending = self.placeholder();
        self.nodes[id.0].derivatives.insert(value.clone(), pending);

        let result = match op {
            Op::Cat => self.derive_cat(l, r, value),
            Op::Alt => self.derive_alt(l, r, value),
        };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.nodes[id.0].derivatives.remove(value);
                return Err(e);
            }
        };

        self.assign(pending, result);
        let result = if result == pending {
            self.null()
        } else {
            // placeholders inside a fresh result may have been bound in the meantime
            if result.0 > pending.0 {
                self.fold_left(result);
            }
            result
        };
        self.nodes[id.0].derivatives.insert(value.clone(), result);

        log::trace!("d/{value:?} {id} = {result}");
        Ok(result)
    }

    /// a: (l r) => (a: l) r            if l is not nullable
    /// a: (l r) => (a: l) r | (a: r)   if l is nullable
    fn derive_cat(&mut self, l: NodeId, r: NodeId, value: &T) -> Result<NodeId, GrammarError> {
        let dl = self.derive(l, value)?;
        let head = self.concat(dl, r);
        if !self.nullable(l)? {
            return Ok(head);
        }
        let dr = self.derive(r, value)?;
        Ok(self.union(head, dr))
    }

    /// a: (l | r) => (a: l) | (a: r)
    fn derive_alt(&mut self, l: NodeId, r: NodeId, value: &T) -> Result<NodeId, GrammarError> {
        let dl = self.derive(l, value)?;
        let dr = self.derive(r, value)?;
        Ok(self.union(dl, dr))
    }
}

#[derive(Clone, Copy)]
enum Op {
    Cat,
    Alt,
}
