#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

// lets the code emitted by `grammar!` name this crate from within its own tests
extern crate self as derp;

pub use derp_grammar::*;

pub use derp_macros::grammar;
