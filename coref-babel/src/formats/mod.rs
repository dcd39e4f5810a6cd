//! Format implementations
//!
//! Each format converts between its records and the graph, using the shared codecs.

pub mod json;
pub mod text;

pub use json::{JsonFormat, JsonRecord};
pub use text::TextFormat;
