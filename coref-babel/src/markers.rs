//! Inline mention markers
//!
//!     Two notations mark mention boundaries on the tokens of the text format.
//!
//!     Brackets append markers after a `|`, comma separated and sorted lexicographically:
//!
//!         Mary|[e2 left|e2] he|[e1]
//!
//!     Tags wrap the form, outermost mention first:
//!
//!         <e2>Mary left</e2> <e1>he</e1>
//!
//!     Parsing returns the markers of a token in the order they must be applied. Bracket
//!     closings come before openings (`e1]` then `[e1` is a new mention after an old one).
//!     Tag openings come before closings (`<e1>x</e1>` encloses `x`).

use std::cmp::Ordering;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarkerKind {
    Close,
    Single,
    Open,
}

/// One boundary of one mention on one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub eid: String,
}

impl Marker {
    pub fn new(kind: MarkerKind, eid: impl Into<String>) -> Self {
        Marker {
            kind,
            eid: eid.into(),
        }
    }

    pub fn bracket(&self) -> String {
        match self.kind {
            MarkerKind::Open => format!("[{}", self.eid),
            MarkerKind::Close => format!("{}]", self.eid),
            MarkerKind::Single => format!("[{}]", self.eid),
        }
    }
}

/// A marker being written, with the rendered span of its mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    pub marker: Marker,
    pub start: usize,
    pub end: usize,
}

/// `form|m1,m2` with markers sorted lexicographically, or the bare form.
pub fn render_brackets(form: &str, markers: &[Placed]) -> String {
    if markers.is_empty() {
        return form.to_string();
    }
    let mut rendered: Vec<String> = markers.iter().map(|p| p.marker.bracket()).collect();
    rendered.sort();
    format!("{form}|{}", rendered.join(","))
}

/// `<a><b>form</b></a>`, nesting by span extent.
///
/// Openings go widest first (descending end, then descending tag text). Closings go
/// innermost first (descending start, then ascending tag text, the reverse of the opening
/// tie order), so the tags of one document always nest.
pub fn render_tags(form: &str, markers: &[Placed]) -> String {
    let mut opening: Vec<&Placed> = markers
        .iter()
        .filter(|p| p.marker.kind != MarkerKind::Close)
        .collect();
    opening.sort_by(|a, b| {
        b.end
            .cmp(&a.end)
            .then_with(|| b.marker.eid.cmp(&a.marker.eid))
    });
    let mut closing: Vec<&Placed> = markers
        .iter()
        .filter(|p| p.marker.kind != MarkerKind::Open)
        .collect();
    closing.sort_by(|a, b| match b.start.cmp(&a.start) {
        Ordering::Equal => a.marker.eid.cmp(&b.marker.eid),
        order => order,
    });

    let mut out = String::new();
    for placed in opening {
        out.push_str(&format!("<{}>", placed.marker.eid));
    }
    out.push_str(form);
    for placed in closing {
        out.push_str(&format!("</{}>", placed.marker.eid));
    }
    out
}

/// Split a bracket-style token into its form and markers.
///
/// Marker lists are split on `,` and `-`. Pieces without a bracket and pieces with an
/// empty id are skipped with a warning.
pub fn parse_brackets(token: &str) -> (String, Vec<Marker>) {
    let Some((form, list)) = token.split_once('|') else {
        return (token.to_string(), Vec::new());
    };
    let mut markers: Vec<Marker> = list
        .split([',', '-'])
        .filter_map(|piece| {
            let opens = piece.starts_with('[');
            let closes = piece.ends_with(']');
            let eid = piece.trim_start_matches('[').trim_end_matches(']');
            let kind = match (opens, closes) {
                (true, true) => MarkerKind::Single,
                (true, false) => MarkerKind::Open,
                (false, true) => MarkerKind::Close,
                (false, false) => {
                    warn!(token, marker = piece, "marker without a bracket skipped");
                    return None;
                }
            };
            if eid.is_empty() {
                warn!(token, "marker with an empty id skipped");
                return None;
            }
            Some(Marker::new(kind, eid))
        })
        .collect();
    markers.sort_by_key(|m| m.kind);
    (form.to_string(), markers)
}

/// Split a tag-style token into its form and markers.
pub fn parse_tags(token: &str) -> (String, Vec<Marker>) {
    let mut markers = Vec::new();
    let mut rest = token;

    while let Some(body) = rest.strip_prefix('<').filter(|b| !b.starts_with('/')) {
        let Some(end) = body.find('>') else { break };
        push_tag(&mut markers, MarkerKind::Open, &body[..end], token);
        rest = &body[end + 1..];
    }

    let mut closing = Vec::new();
    while rest.ends_with('>') {
        let Some(start) = rest.rfind("</") else { break };
        closing.push(rest[start + 2..rest.len() - 1].to_string());
        rest = &rest[..start];
    }
    // collected right to left
    for eid in closing.iter().rev() {
        push_tag(&mut markers, MarkerKind::Close, eid, token);
    }
    (rest.to_string(), markers)
}

fn push_tag(markers: &mut Vec<Marker>, kind: MarkerKind, eid: &str, token: &str) {
    if eid.is_empty() {
        warn!(token, "tag with an empty id skipped");
    } else {
        markers.push(Marker::new(kind, eid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn placed(kind: MarkerKind, eid: &str, start: usize, end: usize) -> Placed {
        Placed {
            marker: Marker::new(kind, eid),
            start,
            end,
        }
    }

    #[test]
    fn bracket_markers_sort_lexicographically() {
        let markers = [
            placed(MarkerKind::Close, "e1", 0, 3),
            placed(MarkerKind::Single, "e3", 3, 3),
            placed(MarkerKind::Open, "e2", 3, 5),
        ];
        assert_eq!(render_brackets("x", &markers), "x|[e2,[e3],e1]");
        assert_eq!(render_brackets("x", &[]), "x");
    }

    #[test]
    fn tags_nest_by_extent() {
        let markers = [
            placed(MarkerKind::Single, "e2", 2, 2),
            placed(MarkerKind::Open, "e1", 2, 4),
        ];
        assert_eq!(render_tags("x", &markers), "<e1><e2>x</e2>");

        let closing = [
            placed(MarkerKind::Close, "e1", 0, 4),
            placed(MarkerKind::Close, "e2", 3, 4),
        ];
        assert_eq!(render_tags("y", &closing), "y</e2></e1>");
    }

    #[test]
    fn tied_tags_still_nest() {
        let markers = [
            placed(MarkerKind::Open, "e1", 0, 2),
            placed(MarkerKind::Open, "e2", 0, 2),
        ];
        assert_eq!(render_tags("a", &markers), "<e2><e1>a");
        let markers = [
            placed(MarkerKind::Close, "e1", 0, 2),
            placed(MarkerKind::Close, "e2", 0, 2),
        ];
        assert_eq!(render_tags("c", &markers), "c</e1></e2>");
    }

    #[rstest]
    #[case("Mary", "Mary", vec![])]
    #[case("Mary|[e2", "Mary", vec![Marker::new(MarkerKind::Open, "e2")])]
    #[case("left|e2]", "left", vec![Marker::new(MarkerKind::Close, "e2")])]
    #[case("he|[e1]", "he", vec![Marker::new(MarkerKind::Single, "e1")])]
    #[case(
        "x|[e3,e1]-[e2]",
        "x",
        vec![
            Marker::new(MarkerKind::Close, "e1"),
            Marker::new(MarkerKind::Single, "e2"),
            Marker::new(MarkerKind::Open, "e3"),
        ]
    )]
    #[case("x|[],e1,e2]", "x", vec![Marker::new(MarkerKind::Close, "e2")])]
    fn parses_bracket_tokens(
        #[case] token: &str,
        #[case] form: &str,
        #[case] markers: Vec<Marker>,
    ) {
        assert_eq!(parse_brackets(token), (form.to_string(), markers));
    }

    #[rstest]
    #[case("Mary", "Mary", vec![])]
    #[case("<e2>Mary", "Mary", vec![Marker::new(MarkerKind::Open, "e2")])]
    #[case("left</e2>", "left", vec![Marker::new(MarkerKind::Close, "e2")])]
    #[case(
        "<e1><e2>x</e2>",
        "x",
        vec![
            Marker::new(MarkerKind::Open, "e1"),
            Marker::new(MarkerKind::Open, "e2"),
            Marker::new(MarkerKind::Close, "e2"),
        ]
    )]
    #[case(
        "y</e2></e1>",
        "y",
        vec![
            Marker::new(MarkerKind::Close, "e2"),
            Marker::new(MarkerKind::Close, "e1"),
        ]
    )]
    #[case("<>z", "z", vec![])]
    fn parses_tag_tokens(#[case] token: &str, #[case] form: &str, #[case] markers: Vec<Marker>) {
        assert_eq!(parse_tags(token), (form.to_string(), markers));
    }
}
