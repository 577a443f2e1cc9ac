use proc_macro::TokenStream;
use syn::parse_macro_input;

mod grammar;

/// Builds a `derp::Language<char>` from rules in the grammar notation.
///
/// ```
/// # use derp::grammar;
/// let mut parens = grammar! {
///     S = '(' S ')' S | e;
/// };
/// assert!(parens.accepts("S", "(()())".chars()).unwrap());
/// assert!(!parens.accepts("S", "(()".chars()).unwrap());
/// ```
///
/// The grammar is built and checked at compile time: nonterminals that are used but
/// never defined, or defined twice, are compile errors.
///
/// With the `dot` feature, `#[graph = "file.dot"]` in front of the rules writes a
/// graphviz rendering of the grammar while compiling.
#[proc_macro]
pub fn grammar(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as grammar::GrammarInput);
    input.compile().into()
}
