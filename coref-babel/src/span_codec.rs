//! Mentions to inline markers and back
//!
//!     Encoding turns every mention into markers on the rendered tokens. A discontinuous
//!     mention is first reduced to the subspan holding its head; the rest of it is lost, as
//!     the text format has no way to express gaps. Mentions are visited by start ascending,
//!     end descending and entity order, which is also the order sequential ids are handed
//!     out in.
//!
//!     Decoding scans the markers left to right with one stack of open positions per entity
//!     id. Closing pops the latest opening of that id and creates a mention over everything
//!     in between.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use coref_conllu::{Document, Result as GraphResult, TokenId};
use tracing::warn;

use crate::ids::SequentialIds;
use crate::markers::{Marker, MarkerKind, Placed};
use crate::render::Rendering;

struct Span<'a> {
    start: usize,
    end: usize,
    entity: usize,
    eid: &'a str,
}

/// Markers for every rendered token, index-aligned with `rendering`.
pub fn encode_markers(
    doc: &Document,
    rendering: &Rendering,
    sequential_ids: bool,
) -> Vec<Vec<Placed>> {
    let mut spans: Vec<Span> = Vec::new();
    for (entity, e) in doc.entities().iter().enumerate() {
        for mention in &e.mentions {
            if let Some((start, end)) = rendering.mention_range(doc, mention) {
                spans.push(Span {
                    start,
                    end,
                    entity,
                    eid: &e.eid,
                });
            }
        }
    }
    spans.sort_by_key(|s| (s.start, Reverse(s.end), s.entity));

    let mut ids = SequentialIds::new();
    let mut markers = vec![Vec::new(); rendering.len()];
    for span in spans {
        let eid = if sequential_ids {
            ids.get(span.eid)
        } else {
            span.eid.to_string()
        };
        let place = |kind| Placed {
            marker: Marker::new(kind, eid.clone()),
            start: span.start,
            end: span.end,
        };
        if span.start == span.end {
            markers[span.start].push(place(MarkerKind::Single));
        } else {
            markers[span.start].push(place(MarkerKind::Open));
            markers[span.end].push(place(MarkerKind::Close));
        }
    }
    markers
}

/// Create the entities and mentions described by `markers` on the aligned tokens.
///
/// `markers[i]` belongs to `aligned[i]` and is applied in the order given. Entities are
/// created when their id is first opened.
pub fn decode_markers(
    doc: &mut Document,
    aligned: &[TokenId],
    markers: &[Vec<Marker>],
) -> GraphResult<()> {
    let mut open: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (position, token_markers) in markers.iter().enumerate().take(aligned.len()) {
        for marker in token_markers {
            match marker.kind {
                MarkerKind::Open => {
                    entity_for(doc, &marker.eid)?;
                    open.entry(marker.eid.clone()).or_default().push(position);
                }
                MarkerKind::Single => {
                    let entity = entity_for(doc, &marker.eid)?;
                    doc.create_mention(entity, &aligned[position..=position])?;
                }
                MarkerKind::Close => {
                    let Some(start) = open.get_mut(&marker.eid).and_then(Vec::pop) else {
                        warn!(
                            doc = %doc.id,
                            position,
                            eid = %marker.eid,
                            "closing marker without an opening one dropped"
                        );
                        continue;
                    };
                    let entity = entity_for(doc, &marker.eid)?;
                    doc.create_mention(entity, &aligned[start..=position])?;
                }
            }
        }
    }

    for (eid, starts) in &open {
        for start in starts {
            warn!(doc = %doc.id, eid = %eid, position = start, "unterminated mention dropped");
        }
    }
    Ok(())
}

fn entity_for(doc: &mut Document, eid: &str) -> GraphResult<usize> {
    match doc.entity_index(eid) {
        Some(index) => Ok(index),
        None => doc.create_entity(eid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{parse_brackets, render_brackets};

    fn words(doc: &mut Document, forms: &[&str]) -> Vec<TokenId> {
        doc.push_sentence(forms)
    }

    fn bracket_line(doc: &mut Document, sequential_ids: bool) -> String {
        let rendering = Rendering::prepare(doc, false);
        let markers = encode_markers(doc, &rendering, sequential_ids);
        rendering
            .forms(doc, true)
            .iter()
            .zip(&markers)
            .map(|(form, m)| render_brackets(form, m))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn discontinuous_mention_is_reduced_to_head_subspan() {
        let mut doc = Document::new("d");
        let ids = words(&mut doc, &["a", "b", "c", "d", "e"]);
        let entity = doc.create_entity("x").unwrap();
        doc.create_mention_with_head(entity, &[ids[0], ids[1], ids[3], ids[4]], ids[3])
            .unwrap();
        assert_eq!(bracket_line(&mut doc, false), "a b c d|[x e|x]");
    }

    #[test]
    fn sequential_ids_follow_first_appearance() {
        let mut doc = Document::new("d");
        let ids = words(&mut doc, &["a", "b", "c"]);
        let late = doc.create_entity("e9").unwrap();
        let early = doc.create_entity("e4").unwrap();
        doc.create_mention(late, &ids[2..]).unwrap();
        doc.create_mention(early, &ids[..1]).unwrap();
        doc.create_mention(late, &ids[1..2]).unwrap();

        let first = bracket_line(&mut doc, true);
        assert_eq!(first, "a|[e1] b|[e2] c|[e2]");
        assert_eq!(bracket_line(&mut doc, true), first);
        assert_eq!(bracket_line(&mut doc, false), "a|[e4] b|[e9] c|[e9]");
    }

    #[test]
    fn decodes_nested_and_repeated_mentions() {
        let mut doc = Document::new("d");
        let ids = words(&mut doc, &["a", "b", "c", "d"]);
        let markers: Vec<Vec<Marker>> = ["a|[e1", "b|[e2]", "c|e1],[e1", "d|e1]"]
            .iter()
            .map(|t| parse_brackets(t).1)
            .collect();
        decode_markers(&mut doc, &ids, &markers).unwrap();

        let spans: Vec<(String, String)> = doc
            .entities()
            .iter()
            .flat_map(|e| e.mentions.iter().map(|m| (e.eid.clone(), m.span(&doc))))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("e1".to_string(), "1-3".to_string()),
                ("e1".to_string(), "3-4".to_string()),
                ("e2".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn stray_closings_and_unterminated_openings_are_dropped() {
        let mut doc = Document::new("d");
        let ids = words(&mut doc, &["a", "b"]);
        let markers = vec![
            vec![Marker::new(MarkerKind::Close, "e1")],
            vec![Marker::new(MarkerKind::Open, "e2")],
        ];
        decode_markers(&mut doc, &ids, &markers).unwrap();
        assert!(doc.entity("e1").is_none());
        assert!(doc.entity("e2").unwrap().mentions.is_empty());
    }
}
