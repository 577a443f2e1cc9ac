use crate::node::{Grammar, NodeId};
use crate::{Alphabet, GrammarError};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// A [`Grammar`] with named nonterminals.
///
/// Every name stands for a placeholder that is created the first time the name is used,
/// so rules can refer to nonterminals that are only defined further down. All the
/// combinators of the underlying grammar are available through [`Deref`].
///
/// ```
/// # use derp_grammar::Language;
/// let mut lang = Language::new();
/// // S = '(' S ')' S | e
/// let s = lang.nonterminal("S");
/// let open = lang.terminal('(');
/// let close = lang.terminal(')');
/// let tail = lang.concat(close, s);
/// let tail = lang.concat(s, tail);
/// let nested = lang.concat(open, tail);
/// let eps = lang.epsilon();
/// let def = lang.union(nested, eps);
/// lang.define("S", def).unwrap();
///
/// assert!(lang.accepts("S", "(()())()".chars()).unwrap());
/// assert!(!lang.accepts("S", "(()".chars()).unwrap());
/// ```
#[derive(Debug)]
pub struct Language<T> {
    grammar: Grammar<T>,
    symbols: BTreeMap<String, NodeId>,
}

impl<T: Alphabet> Default for Language<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Alphabet> Language<T> {
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
            symbols: BTreeMap::new(),
        }
    }

    /// The placeholder for the nonterminal `name`.
    pub fn nonterminal(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.symbols.get(name) {
            return id;
        }
        let id = self.grammar.placeholder();
        log::trace!("new nonterminal {name} at {id}");
        self.symbols.insert(name.to_string(), id);
        id
    }

    /// Defines the nonterminal `name` as the language of `definition`.
    pub fn define(&mut self, name: &str, definition: NodeId) -> Result<NodeId, GrammarError> {
        let id = self.nonterminal(name);
        match self.grammar.bind(id, definition) {
            Ok(()) => Ok(id),
            Err(GrammarError::InvalidRebinding(_)) => {
                Err(GrammarError::DuplicateDefinition(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Checks that every nonterminal that was used also got a definition.
    /// Reports the first undefined one in name order.
    pub fn check(&self) -> Result<(), GrammarError> {
        match self
            .symbols
            .iter()
            .find(|(_, &id)| self.grammar.node(id).is_unbound())
        {
            Some((name, _)) => Err(GrammarError::UndefinedNonterminal(name.clone())),
            None => Ok(()),
        }
    }

    /// Returns true if `input` is a sentence of the nonterminal `name`.
    pub fn accepts<I>(&mut self, name: &str, input: I) -> Result<bool, GrammarError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let start = self
            .symbol(name)
            .ok_or_else(|| GrammarError::UndefinedNonterminal(name.to_string()))?;
        self.grammar.matches(start, input)
    }

    pub fn symbol(&self, name: &str) -> Option<NodeId> {
        self.symbols.get(name).copied()
    }

    /// All nonterminals, in name order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.symbols.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn grammar(&self) -> &Grammar<T> {
        &self.grammar
    }

    pub fn into_grammar(self) -> Grammar<T> {
        self.grammar
    }
}

impl<T> Deref for Language<T> {
    type Target = Grammar<T>;

    fn deref(&self) -> &Self::Target {
        &self.grammar
    }
}

impl<T> DerefMut for Language<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.grammar
    }
}

#[cfg(test)]
mod tests {
    use crate::{GrammarError, Language};

    /// lisp = '(' item ')' | 's'
    /// item = item lisp | e
    fn lisp() -> Language<char> {
        let mut lang = Language::new();
        let lisp = lang.nonterminal("lisp");
        let item = lang.nonterminal("item");

        let open = lang.terminal('(');
        let close = lang.terminal(')');
        let s = lang.terminal('s');
        let inner = lang.concat(item, close);
        let list = lang.concat(open, inner);
        let def = lang.union(list, s);
        lang.define("lisp", def).unwrap();

        let more = lang.concat(item, lisp);
        let eps = lang.epsilon();
        let def = lang.union(more, eps);
        lang.define("item", def).unwrap();

        lang.check().unwrap();
        lang
    }

    #[test]
    fn forward_references() {
        let mut lang = lisp();
        assert!(lang.accepts("lisp", "s".chars()).unwrap());
        assert!(lang.accepts("lisp", "()".chars()).unwrap());
        assert!(lang.accepts("lisp", "(s(s)())".chars()).unwrap());
        assert!(!lang.accepts("lisp", "".chars()).unwrap());
        assert!(!lang.accepts("lisp", "(s".chars()).unwrap());
        assert!(!lang.accepts("lisp", "ss".chars()).unwrap());

        assert!(lang.accepts("item", "".chars()).unwrap());
        assert!(lang.accepts("item", "ss()".chars()).unwrap());
    }

    #[test]
    fn nonterminals_are_shared() {
        let mut lang = Language::<char>::new();
        let a = lang.nonterminal("a");
        assert_eq!(lang.nonterminal("a"), a);
        assert_ne!(lang.nonterminal("b"), a);
        assert_eq!(lang.symbol("a"), Some(a));
        assert_eq!(lang.symbol("c"), None);
        let names: Vec<_> = lang.symbols().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn duplicate_definition() {
        let mut lang = Language::new();
        let x = lang.terminal('x');
        lang.define("a", x).unwrap();
        assert_eq!(
            lang.define("a", x),
            Err(GrammarError::DuplicateDefinition("a".to_string()))
        );
    }

    #[test]
    fn undefined_nonterminal() {
        let mut lang = Language::new();
        let b = lang.nonterminal("b");
        let x = lang.terminal('x');
        let def = lang.concat(x, b);
        lang.define("a", def).unwrap();

        assert_eq!(
            lang.check(),
            Err(GrammarError::UndefinedNonterminal("b".to_string()))
        );
        assert_eq!(
            lang.accepts("c", "x".chars()),
            Err(GrammarError::UndefinedNonterminal("c".to_string()))
        );
        assert_eq!(
            lang.accepts("a", "xy".chars()),
            Err(GrammarError::MalformedGrammar(b))
        );
    }

    #[test]
    fn alias_of_later_definition() {
        let mut lang = Language::new();
        let b = lang.nonterminal("b");
        lang.define("a", b).unwrap();
        let x = lang.terminal('x');
        lang.define("b", x).unwrap();
        lang.check().unwrap();

        assert!(lang.accepts("a", "x".chars()).unwrap());
        assert!(!lang.accepts("a", "".chars()).unwrap());
    }
}
