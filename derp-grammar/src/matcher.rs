use crate::node::{Grammar, NodeId};
use crate::{Alphabet, GrammarError};
use std::borrow::Borrow;

/// Matches input incrementally against a grammar.
///
/// The states are grammar nodes, and accepting a token moves to its derivative.
/// States and transitions are only built as the input asks for them, and are cached
/// in the grammar, so later matchers on the same grammar reuse them.
pub struct GrammarMatcher<'g, T> {
    grammar: &'g mut Grammar<T>,
    current: NodeId,
}

impl<'g, T: Alphabet> GrammarMatcher<'g, T> {
    pub fn new(grammar: &'g mut Grammar<T>, start: NodeId) -> Self {
        Self {
            grammar,
            current: start,
        }
    }

    /// accepts the specified symbol.
    ///
    /// If accepting failed, the new state is rejecting, and stays rejecting.
    pub fn accept(&mut self, value: &T) -> Result<(), GrammarError> {
        if self.is_rejecting() {
            return Ok(());
        }
        self.current = self.grammar.derive(self.current, value)?;
        log::trace!("accepted {value:?}, now in {}", self.current);
        Ok(())
    }

    /// Returns true if the grammar accepts the rest of the input.
    pub fn accepts<I>(mut self, input: I) -> Result<bool, GrammarError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        for value in input {
            self.accept(value.borrow())?;
            if self.is_rejecting() {
                return Ok(false);
            }
        }
        self.is_accepting()
    }

    /// Whether the input accepted so far is a sentence of the grammar.
    pub fn is_accepting(&mut self) -> Result<bool, GrammarError> {
        self.grammar.nullable(self.current)
    }

    /// Whether no continuation of the input can be accepted any more.
    pub fn is_rejecting(&self) -> bool {
        self.grammar.is_null(self.current)
    }

    /// The node for the input accepted so far.
    pub fn state(&self) -> NodeId {
        self.current
    }
}

impl<T: Alphabet> Grammar<T> {
    pub fn matcher(&mut self, start: NodeId) -> GrammarMatcher<'_, T> {
        GrammarMatcher::new(self, start)
    }

    /// Returns true if `input` is a sentence of the language of `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` was created by another grammar.
    ///
    /// ```
    /// # use derp_grammar::Grammar;
    /// let mut g = Grammar::new();
    /// let ab = g.sequence("ab".chars());
    /// let abs = g.star(ab);
    ///
    /// assert!(g.matches(abs, "abab".chars()).unwrap());
    /// assert!(!g.matches(abs, "aba".chars()).unwrap());
    /// ```
    pub fn matches<I>(&mut self, start: NodeId, input: I) -> Result<bool, GrammarError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        log::debug!("matching from {start}");
        let result = self.matcher(start).accepts(input);
        log::debug!("match from {start}: {result:?}");
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{Grammar, GrammarError};

    #[test]
    fn terminal() {
        let mut g = Grammar::new();
        let a = g.terminal('a');
        assert!(g.matches(a, "a".chars()).unwrap());
        assert!(!g.matches(a, "".chars()).unwrap());
        assert!(!g.matches(a, "aa".chars()).unwrap());
        assert!(!g.matches(a, "b".chars()).unwrap());

        let eps = g.epsilon();
        assert!(g.matches(eps, "".chars()).unwrap());
        assert!(!g.matches(eps, "a".chars()).unwrap());
    }

    #[test]
    fn borrowed_input() {
        let mut g = Grammar::new();
        let hello = g.sequence(["hello".to_string(), "world".to_string()]);
        let words = ["hello".to_string(), "world".to_string()];
        assert!(g.matches(hello, &words).unwrap());
        assert!(g.matches(hello, words).unwrap());
    }

    #[test]
    fn incremental() {
        let mut g = Grammar::new();
        let a = g.terminal('a');
        let b = g.terminal('b');
        let a_star = g.star(a);
        let start = g.concat(a_star, b);

        let mut m = g.matcher(start);
        assert!(!m.is_accepting().unwrap());
        m.accept(&'a').unwrap();
        m.accept(&'a').unwrap();
        assert!(!m.is_accepting().unwrap());
        assert!(!m.is_rejecting());
        m.accept(&'b').unwrap();
        assert!(m.is_accepting().unwrap());
        m.accept(&'b').unwrap();
        assert!(m.is_rejecting());
        assert!(!m.is_accepting().unwrap());
    }

    #[test]
    fn rejecting_stops_early() {
        let mut g = Grammar::new();
        let p = g.placeholder();
        let a = g.terminal('a');
        let ap = g.concat(a, p);

        // the placeholder is never reached
        assert!(!g.matches(ap, "ba".chars()).unwrap());
        assert_eq!(
            g.matches(ap, "ab".chars()),
            Err(GrammarError::MalformedGrammar(p))
        );
    }

    #[test]
    fn warm_cache_allocates_nothing() {
        let mut g = Grammar::new();
        let a = g.terminal('a');
        let b = g.terminal('b');
        let ab = g.union(a, b);
        let words = g.plus(ab);

        assert!(g.matches(words, "abba".chars()).unwrap());
        let count = g.node_count();
        assert!(g.matches(words, "abba".chars()).unwrap());
        assert_eq!(count, g.node_count());
    }
}
