//! # coref-conllu
//!
//! CoNLL-U annotation graph with CorefUD coreference.
//!
//! This crate is the graph service the transcoders in `coref-babel` work against. It loads
//! CoNLL-U files into [`Document`]s, lets callers create entities and mentions, manages the
//! ordinals of empty tokens, and writes documents back out.
//!
//! Layout
//!
//!     .
//!     ├── ordinal.rs       integer-pair ordinals (`3`, `3.1`)
//!     ├── document.rs      token arena, positional order, entity table
//!     ├── coref.rs         entities, mentions, subspans and reduction
//!     ├── empty_nodes.rs   insert / shift / remove of empty tokens
//!     ├── corefud.rs       `Entity=` bracket notation
//!     ├── reader.rs        CoNLL-U → documents
//!     └── writer.rs        documents → CoNLL-U
//!
//! Head-significance and single-parent normalization are out of scope; a mention created
//! without an explicit head gets the first span token whose governor is outside the span.

pub mod coref;
mod corefud;
pub mod document;
mod empty_nodes;
pub mod error;
pub mod ordinal;
pub mod reader;
pub mod writer;

pub use coref::{Entity, Mention};
pub use document::{Dep, Document, HeadRef, Misc, Sentence, Token, TokenId};
pub use error::{ConlluError, Result};
pub use ordinal::Ordinal;
pub use reader::{load, parse_str};
pub use writer::{save, to_string, write_document};
