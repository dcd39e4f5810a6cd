//! Text serialization (graph document → marked-up line)

use coref_conllu::Document;

use crate::markers::{render_brackets, render_tags};
use crate::options::{EncodeOptions, MarkerStyle};
use crate::render::Rendering;
use crate::span_codec::encode_markers;

/// Render the tokens of `rendering` as one line, without the trailing newline.
pub fn serialize_line(
    doc: &Document,
    rendering: &Rendering,
    options: &EncodeOptions,
    style: MarkerStyle,
) -> String {
    let forms = rendering.forms(doc, true);
    if options.blind {
        return forms.join(" ");
    }
    let markers = encode_markers(doc, rendering, options.sequential_ids);
    forms
        .iter()
        .zip(&markers)
        .map(|(form, placed)| match style {
            MarkerStyle::Brackets => render_brackets(form, placed),
            MarkerStyle::Tags => render_tags(form, placed),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use coref_conllu::TokenId;

    fn nested() -> (Document, Vec<TokenId>) {
        let mut doc = Document::new("d");
        let ids = doc.push_sentence(&["a", "b", "c"]);
        // the inner entity is created first; nesting must not depend on it
        let inner = doc.create_entity("e2").unwrap();
        let outer = doc.create_entity("e1").unwrap();
        doc.create_mention(inner, &ids[1..2]).unwrap();
        doc.create_mention(outer, &ids).unwrap();
        (doc, ids)
    }

    fn line(doc: &mut Document, options: &EncodeOptions, style: MarkerStyle) -> String {
        let rendering = Rendering::prepare(doc, options.zero_mentions);
        serialize_line(doc, &rendering, options, style)
    }

    #[test]
    fn tags_put_the_widest_span_outermost() {
        let (mut doc, _) = nested();
        let options = EncodeOptions::default();
        insta::assert_snapshot!(line(&mut doc, &options, MarkerStyle::Tags), @"<e1>a <e2>b</e2> c</e1>");
        insta::assert_snapshot!(line(&mut doc, &options, MarkerStyle::Brackets), @"a|[e1 b|[e2] c|e1]");
    }

    #[test]
    fn blind_output_has_no_markers() {
        let (mut doc, _) = nested();
        let options = EncodeOptions {
            blind: true,
            ..EncodeOptions::default()
        };
        assert_eq!(line(&mut doc, &options, MarkerStyle::Tags), "a b c");
    }
}
