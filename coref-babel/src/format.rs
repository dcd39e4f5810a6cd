//! Format trait definition
//!
//! A format is one side of a transcoding run: it reads its own source into reference
//! documents (the words of each document and their coreference) and writes a graph document
//! as one of its records. Alignment and the mention codecs are shared, so formats only deal
//! with their own syntax.

use coref_conllu::Document;

use crate::error::FormatError;
use crate::markers::Marker;
use crate::options::EncodeOptions;
use crate::render::Rendering;

/// Coreference as a format carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Per-word inline markers, in application order
    Markers(Vec<Vec<Marker>>),
    /// Offset clusters; `None` for blind output
    Clusters(Option<Vec<Vec<[usize; 2]>>>),
}

/// One document read from a format, before it is aligned with a skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDocument {
    pub doc_id: Option<String>,
    /// Rendered forms without markup
    pub words: Vec<String>,
    pub annotation: Annotation,
}

/// Trait for document formats
///
/// Records are streamed: a run writes [`Format::begin`], then every record with
/// [`Format::separator`] between them, then [`Format::end`].
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "text", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions this format uses, without the dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → reference documents)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (graph document → record)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into reference documents
    fn parse(&self, _source: &str) -> Result<Vec<ReferenceDocument>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Render one document as one record
    ///
    /// `rendering` is the token selection the record must follow; the document has already
    /// been prepared for it.
    fn serialize(
        &self,
        _doc: &Document,
        _rendering: &Rendering,
        _options: &EncodeOptions,
    ) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }

    fn begin(&self) -> &str {
        ""
    }

    fn separator(&self) -> &str {
        ""
    }

    fn end(&self) -> &str {
        ""
    }
}
