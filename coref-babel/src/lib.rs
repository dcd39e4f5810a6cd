//! Coreference interchange between CorefUD graphs, marked-up text and cluster JSON
//!
//!     This crate moves entity and mention annotations between three representations of
//!     the same documents: the CoNLL-U graph of `coref-conllu`, one line of marked-up text
//!     per document, and offset-based cluster JSON.
//!
//!     This is a pure lib: it powers `coref-cli` but makes no assumption about a shell. It
//!     logs through `tracing` and never prints.
//!
//! Architecture
//!
//!     - Format trait: one interface for reading and writing records of any format
//!     - Token aligner: one-to-one correspondence between a word list and graph tokens
//!     - Span codec / cluster codec: mentions to markers or offsets and back
//!     - Drivers: the four file pipelines, composed from the above
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── options.rs            # encode / decode knobs
//!     ├── format.rs             # Format trait definition
//!     ├── render.rs             # rendered token sequences
//!     ├── align.rs              # token aligner
//!     ├── markers.rs            # bracket and tag marker syntax
//!     ├── ids.rs                # sequential entity ids
//!     ├── span_codec.rs         # mentions <-> inline markers
//!     ├── cluster_codec.rs      # mentions <-> offset clusters
//!     ├── formats
//!     │   ├── text              # marked-up text
//!     │   └── json.rs           # cluster JSON
//!     ├── convert.rs            # transcoding drivers
//!     └── lib.rs
//!
//! Lossy corners
//!
//!     Text and JSON cannot express discontinuous mentions, so encoders reduce them to the
//!     subspan holding the head. Without `zero_mentions`, empty tokens are not rendered and
//!     mentions lose them; mentions made only of empty tokens disappear.

pub mod align;
pub mod cluster_codec;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod ids;
pub mod markers;
pub mod options;
pub mod render;
pub mod span_codec;

pub use convert::{
    conllu_to_json, conllu_to_text, decode, default_output_path, encode, json_to_conllu,
    text_to_conllu,
};
pub use error::{AlignmentError, FormatError, TranscodeError};
pub use format::{Annotation, Format, ReferenceDocument};
pub use formats::{JsonFormat, JsonRecord, TextFormat};
pub use options::{DecodeOptions, EncodeOptions, MarkerStyle};
