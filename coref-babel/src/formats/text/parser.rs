//! Text parsing (marked-up line → reference document)

use crate::format::{Annotation, ReferenceDocument};
use crate::markers::{parse_brackets, parse_tags};
use crate::options::MarkerStyle;

/// Split one line into bare words and their markers.
pub fn parse_line(line: &str, style: MarkerStyle) -> ReferenceDocument {
    let (words, markers) = line
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(|token| match style {
            MarkerStyle::Brackets => parse_brackets(token),
            MarkerStyle::Tags => parse_tags(token),
        })
        .unzip();
    ReferenceDocument {
        doc_id: None,
        words,
        annotation: Annotation::Markers(markers),
    }
}
