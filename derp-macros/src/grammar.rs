use derp_grammar::{GrammarDef, GrammarError};
use proc_macro2::{Span, TokenStream};
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Meta};

#[cfg(feature = "dot")]
use derp_grammar::RenderSettings;
#[cfg(feature = "dot")]
use syn::{Expr, ExprLit, Lit, MetaNameValue};

pub(crate) struct GrammarInput {
    attrs: Vec<Attribute>,
    def: GrammarDef,
}

impl Parse for GrammarInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let def = input.parse()?;
        Ok(Self { attrs, def })
    }
}

impl GrammarInput {
    pub fn compile(self) -> TokenStream {
        let Self { attrs, def } = self;
        let mut errors = Vec::new();
        #[cfg(feature = "dot")]
        let mut graph = None;

        for i in attrs {
            let attr = i.meta.clone();
            match attr {
                #[cfg(feature = "dot")]
                Meta::NameValue(MetaNameValue {
                    path,
                    value:
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }),
                    ..
                }) if path.is_ident("graph") => {
                    graph = Some(s);
                }
                i => errors.push(syn::Error::new_spanned(i, "unexpected attribute")),
            }
        }

        match def.build() {
            Ok(_language) => {
                #[cfg(feature = "dot")]
                if let Some(path) = graph {
                    let settings = RenderSettings::default();
                    if let Err(e) = _language.render_to(path.value(), settings) {
                        errors.push(syn::Error::new(
                            path.span(),
                            format!("can't write dot file for graphing at {}: {e}", path.value()),
                        ));
                    }
                }
            }
            Err(e) => errors.push(syn::Error::new(error_span(&def, &e), e.to_string())),
        }

        if let Some(error) = errors.into_iter().reduce(|mut all, e| {
            all.combine(e);
            all
        }) {
            return error.to_compile_error();
        }

        def.emit()
    }
}

/// Points at the nonterminal the error is about.
fn error_span(def: &GrammarDef, error: &GrammarError) -> Span {
    let ident = match error {
        GrammarError::UndefinedNonterminal(name) => def.find_symbol(name),
        GrammarError::DuplicateDefinition(name) => def.find_definitions(name).nth(1),
        _ => None,
    };
    ident.map_or_else(Span::call_site, |i| i.span())
}
