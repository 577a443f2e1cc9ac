use crate::language::Language;
use crate::node::NodeId;
use crate::GrammarError;
use proc_macro2::Ident;
use syn::parse::{Parse, ParseStream};
use syn::{parenthesized, Token};

/// The right hand side of a rule in the grammar notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// `e`
    Epsilon,
    /// `0`
    Null,
    /// `'c'`
    Char(char),
    /// `"abc"`, the sequence of its characters
    Str(String),
    /// A nonterminal
    Symbol(Ident),
    /// `E*`
    Star(Box<Expr>),
    /// `E+`
    Plus(Box<Expr>),
    /// `E?`
    Optional(Box<Expr>),
    /// `E F`
    Cat(Box<Expr>, Box<Expr>),
    /// `E | F`
    Alt(Box<Expr>, Box<Expr>),
}

/// `name = expr;`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub name: Ident,
    pub expr: Expr,
}

/// A list of rules, as accepted by [`parse_grammar`](crate::parse_grammar).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrammarDef {
    pub rules: Vec<Rule>,
}

impl Parse for GrammarDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut rules = Vec::new();
        while !input.is_empty() {
            rules.push(input.parse()?);
            if input.is_empty() {
                break;
            }
            input.parse::<Token![;]>()?;
        }
        Ok(Self { rules })
    }
}

impl Parse for Rule {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![=]>()?;
        let expr = input.parse()?;
        Ok(Self { name, expr })
    }
}

impl Parse for Expr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut expr = parse_sequence(input)?;
        while input.peek(Token![|]) {
            input.parse::<Token![|]>()?;
            let right = parse_sequence(input)?;
            expr = Expr::Alt(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }
}

fn starts_atom(input: ParseStream) -> bool {
    input.peek(syn::Ident)
        || input.peek(syn::LitChar)
        || input.peek(syn::LitStr)
        || input.peek(syn::LitInt)
        || input.peek(syn::token::Paren)
}

// concatenation is right-associated: `a b c` is `a (b c)`
fn parse_sequence(input: ParseStream) -> syn::Result<Expr> {
    let mut items = vec![parse_postfix(input)?];
    while starts_atom(input) {
        items.push(parse_postfix(input)?);
    }

    let mut items = items.into_iter().rev();
    let mut expr = items.next().unwrap_or(Expr::Epsilon);
    for item in items {
        expr = Expr::Cat(Box::new(item), Box::new(expr));
    }
    Ok(expr)
}

fn parse_postfix(input: ParseStream) -> syn::Result<Expr> {
    let mut expr = parse_atom(input)?;
    loop {
        if input.peek(Token![*]) {
            input.parse::<Token![*]>()?;
            expr = Expr::Star(Box::new(expr));
        } else if input.peek(Token![+]) {
            input.parse::<Token![+]>()?;
            expr = Expr::Plus(Box::new(expr));
        } else if input.peek(Token![?]) {
            input.parse::<Token![?]>()?;
            expr = Expr::Optional(Box::new(expr));
        } else {
            return Ok(expr);
        }
    }
}

fn parse_atom(input: ParseStream) -> syn::Result<Expr> {
    let lookahead = input.lookahead1();

    // Rust performs parenthesis matching: leverage that here.
    if lookahead.peek(syn::token::Paren) {
        let inner;
        parenthesized!(inner in input);
        let expr = inner.parse()?;
        if !inner.is_empty() {
            return Err(inner.error("unexpected token"));
        }
        return Ok(expr);
    }

    if lookahead.peek(syn::LitInt) {
        let lit = input.parse::<syn::LitInt>()?;
        return match lit.base10_parse() {
            Ok(0u32) => Ok(Expr::Null),
            _ => Err(syn::Error::new(lit.span(), "expected `0`")),
        };
    }

    if lookahead.peek(syn::LitChar) {
        let lit = input.parse::<syn::LitChar>()?;
        return Ok(Expr::Char(lit.value()));
    }

    if lookahead.peek(syn::LitStr) {
        let lit = input.parse::<syn::LitStr>()?;
        return Ok(Expr::Str(lit.value()));
    }

    if lookahead.peek(syn::Ident) {
        let name = input.parse::<Ident>()?;
        if name == "e" {
            return Ok(Expr::Epsilon);
        }
        return Ok(Expr::Symbol(name));
    }

    Err(lookahead.error())
}

impl Expr {
    fn lower(&self, language: &mut Language<char>) -> NodeId {
        match self {
            Expr::Epsilon => language.epsilon(),
            Expr::Null => language.null(),
            Expr::Char(c) => language.terminal(*c),
            Expr::Str(s) => language.sequence(s.chars()),
            Expr::Symbol(name) => language.nonterminal(&name.to_string()),
            Expr::Star(inner) => {
                let inner = inner.lower(language);
                language.star(inner)
            }
            Expr::Plus(inner) => {
                let inner = inner.lower(language);
                language.plus(inner)
            }
            Expr::Optional(inner) => {
                let inner = inner.lower(language);
                language.optional(inner)
            }
            Expr::Cat(l, r) => {
                let l = l.lower(language);
                let r = r.lower(language);
                language.concat(l, r)
            }
            Expr::Alt(l, r) => {
                let l = l.lower(language);
                let r = r.lower(language);
                language.union(l, r)
            }
        }
    }

    /// Calls `f` on every nonterminal in this expression, left to right.
    pub fn visit_symbols<'a>(&'a self, f: &mut impl FnMut(&'a Ident)) {
        match self {
            Expr::Epsilon | Expr::Null | Expr::Char(_) | Expr::Str(_) => {}
            Expr::Symbol(name) => f(name),
            Expr::Star(inner) | Expr::Plus(inner) | Expr::Optional(inner) => {
                inner.visit_symbols(f)
            }
            Expr::Cat(l, r) | Expr::Alt(l, r) => {
                l.visit_symbols(f);
                r.visit_symbols(f);
            }
        }
    }
}

impl GrammarDef {
    /// Builds a language from these rules, and checks that every nonterminal is defined.
    pub fn build(&self) -> Result<Language<char>, GrammarError> {
        let mut language = Language::new();
        self.build_into(&mut language)?;
        language.check()?;
        Ok(language)
    }

    /// Adds these rules to an existing language. Nonterminals may stay undefined.
    pub fn build_into(&self, language: &mut Language<char>) -> Result<(), GrammarError> {
        for rule in &self.rules {
            let definition = rule.expr.lower(language);
            language.define(&rule.name.to_string(), definition)?;
        }
        Ok(())
    }

    /// The first use of the nonterminal `name` on the right hand side of a rule.
    pub fn find_symbol(&self, name: &str) -> Option<&Ident> {
        let mut found = None;
        for rule in &self.rules {
            rule.expr.visit_symbols(&mut |symbol| {
                if found.is_none() && symbol == name {
                    found = Some(symbol);
                }
            });
        }
        found
    }

    /// The rules defining `name`, in order.
    pub fn find_definitions<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Ident> + 'a {
        self.rules
            .iter()
            .map(|rule| &rule.name)
            .filter(move |rule| *rule == name)
    }
}
