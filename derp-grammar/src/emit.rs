use crate::parse::{Expr, GrammarDef};
use proc_macro2::TokenStream;
use quote::quote;

impl GrammarDef {
    /// Convert these rules into rust code that builds the same language at runtime.
    ///
    /// The result is a block expression of type `derp::Language<char>`. The rules are not
    /// checked again at runtime, so only emit rules that [`GrammarDef::build`] accepted.
    pub fn emit(&self) -> TokenStream {
        let names: Vec<_> = self.rules.iter().map(|r| r.name.to_string()).collect();
        let definitions: Vec<_> = self.rules.iter().map(|r| r.expr.emit()).collect();

        quote!({
            let mut language = derp::Language::<char>::new();
            #(
                let definition = #definitions;
                language
                    .define(#names, definition)
                    .expect("grammar was checked at compile time");
            )*
            language
        })
    }
}

impl Expr {
    fn emit(&self) -> TokenStream {
        match self {
            Expr::Epsilon => quote!(language.epsilon()),
            Expr::Null => quote!(language.null()),
            Expr::Char(c) => quote!(language.terminal(#c)),
            Expr::Str(s) => quote!(language.sequence(#s.chars())),
            Expr::Symbol(name) => {
                let name = name.to_string();
                quote!(language.nonterminal(#name))
            }
            Expr::Star(inner) => {
                let inner = inner.emit();
                quote!({
                    let inner = #inner;
                    language.star(inner)
                })
            }
            Expr::Plus(inner) => {
                let inner = inner.emit();
                quote!({
                    let inner = #inner;
                    language.plus(inner)
                })
            }
            Expr::Optional(inner) => {
                let inner = inner.emit();
                quote!({
                    let inner = #inner;
                    language.optional(inner)
                })
            }
            Expr::Cat(l, r) => {
                let (l, r) = (l.emit(), r.emit());
                quote!({
                    let l = #l;
                    let r = #r;
                    language.concat(l, r)
                })
            }
            Expr::Alt(l, r) => {
                let (l, r) = (l.emit(), r.emit());
                quote!({
                    let l = #l;
                    let r = #r;
                    language.union(l, r)
                })
            }
        }
    }
}
