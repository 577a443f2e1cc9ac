use proc_macro2::{LexError, TokenStream};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

mod derive;
mod emit;
mod language;
mod matcher;
mod node;
mod normalize;
mod nullable;
mod parse;
mod token;

#[cfg(feature = "dot")]
mod dot;

#[cfg(feature = "dot")]
pub use dot::RenderSettings;
pub use language::Language;
pub use matcher::GrammarMatcher;
pub use node::{Grammar, Node, NodeId};
pub use parse::{Expr, GrammarDef, Rule};
pub use token::Token;

/// Values that can be used as input symbols of a [`Grammar`].
///
/// Implemented for every type that is cloneable, hashable and comparable.
pub trait Alphabet: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Alphabet for T {}

/// Construction bugs surfaced while building or matching a grammar.
///
/// None of these are transient: matching is a pure function of the grammar and
/// the input, so an error always points at a grammar that was put together wrongly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// An unbound placeholder was reached while deriving or checking nullability.
    #[error("malformed grammar: placeholder {0} was never bound")]
    MalformedGrammar(NodeId),
    #[error("could not decide whether {0} is nullable")]
    UnresolvableNullability(NodeId),
    #[error("placeholder {0} is already bound")]
    InvalidRebinding(NodeId),
    #[error("nonterminal `{0}` is used but never defined")]
    UndefinedNonterminal(String),
    #[error("nonterminal `{0}` is defined more than once")]
    DuplicateDefinition(String),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] syn::Error),
}

/// parse a string to a grammar definition
pub fn parse_grammar(input: impl AsRef<str>) -> Result<GrammarDef, ParseError> {
    let stream: TokenStream = input.as_ref().parse()?;
    Ok(parse_grammar_token_stream(stream)?)
}

/// parse a rust [`TokenStream`](TokenStream) to a grammar definition
pub fn parse_grammar_token_stream(input: TokenStream) -> syn::Result<GrammarDef> {
    syn::parse2(input)
}
