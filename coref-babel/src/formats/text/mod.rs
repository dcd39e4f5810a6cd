//! Marked-up text format
//!
//!     One document per line, tokens separated by single spaces. A space inside a token is
//!     written `_`, empty tokens start with `##`, and mention boundaries are attached to the
//!     tokens they start or end on:
//!
//!         brackets:  John said Mary|[e1 left|e1] .
//!         tags:      John said <e1>Mary left</e1> .
//!
//!     Discontinuous mentions cannot be written and are reduced to the subspan holding their
//!     head. In tag style, two overlapping mentions of one entity that do not nest (`a b` and
//!     `b c`) read back as a nested pair, since a closing tag names only the entity; brackets
//!     keep them apart. The marker style is a property of the format instance, so the same style is
//!     expected when reading a file back.

mod parser;
mod serializer;

use coref_conllu::Document;

use crate::error::FormatError;
use crate::format::{Format, ReferenceDocument};
use crate::options::{EncodeOptions, MarkerStyle};
use crate::render::Rendering;

pub use parser::parse_line;
pub use serializer::serialize_line;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat {
    style: MarkerStyle,
}

impl TextFormat {
    pub fn new(style: MarkerStyle) -> Self {
        TextFormat { style }
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }
}

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "One document per line with inline mention markers"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<ReferenceDocument>, FormatError> {
        Ok(source
            .lines()
            .map(|line| parse_line(line.trim_end_matches('\r'), self.style))
            .collect())
    }

    fn serialize(
        &self,
        doc: &Document,
        rendering: &Rendering,
        options: &EncodeOptions,
    ) -> Result<String, FormatError> {
        let mut line = serialize_line(doc, rendering, options, self.style);
        line.push('\n');
        Ok(line)
    }
}
