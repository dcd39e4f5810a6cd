//! CorefUD `Entity=` annotations
//!
//!     Coreference is stored in the MISC column as bracket notation:
//!
//!         Entity=(e1-person-1-        opening of a mention of e1
//!         Entity=e1)                  closing of the innermost open mention of e1
//!         Entity=(e2-place-1)         single-token mention
//!         Entity=e1)(e3-person-2-     closings come before openings on the same token
//!
//!     Opening fields follow the document's `# global.Entity` layout (default
//!     `eid-etype-head-other`). `head` is the 1-based index of the head among the mention's
//!     tokens. A discontinuous mention writes one bracket pair per subspan with the part
//!     marked on the id: `(e1[1/2]-…` … `e1[1/2])` … `(e1[2/2]` … `e1[2/2])`.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::document::{Document, TokenId};
use crate::error::{ConlluError, Result};

static PART_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<eid>[^\[\]]+)(?:\[(?P<part>\d+)/(?P<total>\d+)\])?$")
        .unwrap_or_else(|e| panic!("invalid part id pattern: {e}"))
});

/// Part `k` of an `n`-part discontinuous mention.
type Part = Option<(u32, u32)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Bracket {
    Open { eid: String, part: Part, fields: Vec<String> },
    Close { eid: String, part: Part },
    Single { eid: String, part: Part, fields: Vec<String> },
}

fn split_part(raw: &str) -> std::result::Result<(String, Part), String> {
    let caps = PART_ID
        .captures(raw)
        .ok_or_else(|| format!("malformed entity id '{raw}'"))?;
    let eid = caps["eid"].to_string();
    let part = match (caps.name("part"), caps.name("total")) {
        (Some(part), Some(total)) => {
            let part = part.as_str().parse().map_err(|_| format!("bad part in '{raw}'"))?;
            let total = total.as_str().parse().map_err(|_| format!("bad part in '{raw}'"))?;
            Some((part, total))
        }
        _ => None,
    };
    Ok((eid, part))
}

/// Split an `Entity=` value into its brackets, in written order.
pub(crate) fn parse_brackets(value: &str) -> std::result::Result<Vec<Bracket>, String> {
    let mut brackets = Vec::new();
    let mut rest = value;
    while !rest.is_empty() {
        if let Some(body) = rest.strip_prefix('(') {
            let end = body.find(['(', ')']).unwrap_or(body.len());
            let single = body[end..].starts_with(')');
            let mut fields = body[..end].split('-').map(str::to_string);
            let (eid, part) = split_part(&fields.next().unwrap_or_default())?;
            let fields: Vec<String> = fields.collect();
            brackets.push(if single {
                Bracket::Single { eid, part, fields }
            } else {
                Bracket::Open { eid, part, fields }
            });
            rest = if single { &body[end + 1..] } else { &body[end..] };
        } else {
            let end = rest
                .find(')')
                .ok_or_else(|| format!("unterminated closing bracket in '{value}'"))?;
            let (eid, part) = split_part(&rest[..end])?;
            brackets.push(Bracket::Close { eid, part });
            rest = &rest[end + 1..];
        }
    }
    Ok(brackets)
}

/// Field positions within a bracket, relative to the fields after the id.
struct Layout {
    etype: Option<usize>,
    head: Option<usize>,
}

impl Layout {
    fn of(doc: &Document) -> Self {
        let field = |name: &str| {
            doc.entity_layout
                .iter()
                .skip(1)
                .position(|f| f == name)
        };
        Layout {
            etype: field("etype"),
            head: field("head"),
        }
    }

    fn last_known(&self) -> Option<usize> {
        self.etype.max(self.head)
    }
}

struct OpenBracket {
    start: TokenId,
    fields: Vec<String>,
}

#[derive(Default)]
struct PartialMention {
    parts: BTreeMap<u32, Vec<TokenId>>,
    total: u32,
    fields: Vec<String>,
}

/// Build entities from the `Entity=` attributes and remove them from MISC.
///
/// Entities are ordered by their first mention, mentions by position.
pub(crate) fn decode_entities(doc: &mut Document) -> Result<()> {
    let layout = Layout::of(doc);
    let mut open: HashMap<(String, Part), Vec<OpenBracket>> = HashMap::new();
    let mut partial: HashMap<String, PartialMention> = HashMap::new();
    let order = doc.token_ids().to_vec();

    for (position, id) in order.iter().enumerate() {
        let Some(value) = doc.get_mut(*id).and_then(|t| t.misc.remove("Entity")) else {
            continue;
        };
        let mut brackets = parse_brackets(&value).map_err(|message| ConlluError::Entity {
            doc: doc.id.clone(),
            message,
        })?;
        // an opening and a closing of one entity on the same token are two different
        // mentions (a one-token mention is written as a single bracket): close first
        brackets.sort_by_key(|b| !matches!(b, Bracket::Close { .. }));
        for bracket in brackets {
            let (eid, part, fields, tokens) = match bracket {
                Bracket::Open { eid, part, fields } => {
                    open.entry((eid, part)).or_default().push(OpenBracket {
                        start: *id,
                        fields,
                    });
                    continue;
                }
                Bracket::Single { eid, part, fields } => (eid, part, fields, vec![*id]),
                Bracket::Close { eid, part } => {
                    let Some(opened) = open.get_mut(&(eid.clone(), part)).and_then(Vec::pop)
                    else {
                        warn!(doc = %doc.id, eid = %eid, "closing bracket without an opening one");
                        continue;
                    };
                    let start = doc.position(opened.start).unwrap_or(position);
                    (eid, part, opened.fields, order[start..=position].to_vec())
                }
            };
            match part {
                None => add_mention(doc, &layout, &eid, &fields, tokens)?,
                Some((k, total)) => {
                    let pending = partial.entry(eid.clone()).or_default();
                    pending.parts.insert(k, tokens);
                    pending.total = total;
                    if pending.fields.is_empty() {
                        pending.fields = fields;
                    }
                    if pending.parts.len() as u32 >= total {
                        if let Some(done) = partial.remove(&eid) {
                            let tokens = done.parts.into_values().flatten().collect();
                            add_mention(doc, &layout, &eid, &done.fields, tokens)?;
                        }
                    }
                }
            }
        }
    }

    for ((eid, _), stack) in &open {
        if !stack.is_empty() {
            warn!(doc = %doc.id, eid = %eid, count = stack.len(), "unterminated mention dropped");
        }
    }
    for (eid, pending) in &partial {
        warn!(
            doc = %doc.id,
            eid = %eid,
            found = pending.parts.len(),
            expected = pending.total,
            "incomplete discontinuous mention dropped"
        );
    }

    sort_entities(doc);
    Ok(())
}

fn add_mention(
    doc: &mut Document,
    layout: &Layout,
    eid: &str,
    fields: &[String],
    tokens: Vec<TokenId>,
) -> Result<()> {
    let entity = match doc.entity_index(eid) {
        Some(index) => index,
        None => doc.create_entity(eid)?,
    };
    let field = |index: Option<usize>| {
        index
            .and_then(|i| fields.get(i))
            .filter(|value| !value.is_empty())
    };
    if let Some(etype) = field(layout.etype) {
        doc.entities_mut()[entity].etype.get_or_insert_with(|| etype.clone());
    }
    let head = field(layout.head)
        .and_then(|h| h.parse::<usize>().ok())
        .and_then(|h| {
            let mut sorted = tokens.clone();
            sorted.sort_by_key(|id| doc.position(*id));
            sorted.get(h.checked_sub(1)?).copied()
        });
    match head {
        Some(head) => doc.create_mention_with_head(entity, &tokens, head)?,
        None => doc.create_mention(entity, &tokens)?,
    };
    let other: Vec<&str> = match layout.last_known() {
        Some(last) => fields.iter().skip(last + 1).map(String::as_str).collect(),
        None => Vec::new(),
    };
    if other.iter().any(|f| !f.is_empty()) {
        if let Some(mention) = doc.entities_mut()[entity].mentions.last_mut() {
            mention.other = Some(other.join("-"));
        }
    }
    Ok(())
}

fn sort_entities(doc: &mut Document) {
    let key = |doc: &Document, tokens: &[TokenId]| {
        let first = tokens.first().and_then(|id| doc.position(*id));
        let last = tokens.last().and_then(|id| doc.position(*id));
        (first.unwrap_or(usize::MAX), std::cmp::Reverse(last))
    };
    let mut entities = std::mem::take(doc.entities_mut());
    for entity in &mut entities {
        entity.mentions.sort_by_key(|m| key(&*doc, m.tokens()));
    }
    entities.sort_by_key(|e| {
        e.mentions
            .first()
            .map(|m| key(&*doc, m.tokens()).0)
            .unwrap_or(usize::MAX)
    });
    *doc.entities_mut() = entities;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Close,
    Open,
    Single,
}

struct Item {
    kind: Kind,
    start: usize,
    end: usize,
    seq: usize,
    text: String,
}

/// Render the `Entity=` value for every token that carries brackets.
///
/// On one token: closings first (latest start first, later-opened first on ties), then
/// openings (widest first), then single-token mentions. The result always nests.
pub(crate) fn encode_entities(doc: &Document) -> HashMap<TokenId, String> {
    let layout = Layout::of(doc);
    let mut items: HashMap<TokenId, Vec<Item>> = HashMap::new();
    let mut seq = 0;

    for entity in doc.entities() {
        for mention in &entity.mentions {
            let subspans = mention.subspans(doc);
            let total = subspans.len();
            let head = mention
                .tokens()
                .iter()
                .position(|t| *t == mention.head)
                .map_or(1, |i| i + 1);
            for (k, subspan) in subspans.iter().enumerate() {
                let (first, last) = (subspan[0], subspan[subspan.len() - 1]);
                let (start, end) = match (doc.position(first), doc.position(last)) {
                    (Some(s), Some(e)) => (s, e),
                    _ => continue,
                };
                let id = if total > 1 {
                    format!("{}[{}/{}]", entity.eid, k + 1, total)
                } else {
                    entity.eid.clone()
                };
                let opening = if k == 0 {
                    opening_fields(&layout, &id, entity.etype.as_deref(), head, mention.other.as_deref(), doc)
                } else {
                    id.clone()
                };
                seq += 1;
                if first == last {
                    items.entry(first).or_default().push(Item {
                        kind: Kind::Single,
                        start,
                        end,
                        seq,
                        text: format!("({opening})"),
                    });
                } else {
                    items.entry(first).or_default().push(Item {
                        kind: Kind::Open,
                        start,
                        end,
                        seq,
                        text: format!("({opening}"),
                    });
                    items.entry(last).or_default().push(Item {
                        kind: Kind::Close,
                        start,
                        end,
                        seq,
                        text: format!("{id})"),
                    });
                }
            }
        }
    }

    items
        .into_iter()
        .map(|(id, mut items)| {
            items.sort_by(|a, b| {
                a.kind.cmp(&b.kind).then_with(|| match a.kind {
                    Kind::Close => b.start.cmp(&a.start).then(b.seq.cmp(&a.seq)),
                    Kind::Open => b.end.cmp(&a.end).then(a.seq.cmp(&b.seq)),
                    Kind::Single => a.seq.cmp(&b.seq),
                })
            });
            (id, items.into_iter().map(|i| i.text).collect())
        })
        .collect()
}

fn opening_fields(
    layout: &Layout,
    id: &str,
    etype: Option<&str>,
    head: usize,
    other: Option<&str>,
    doc: &Document,
) -> String {
    let mut fields = vec![id.to_string()];
    for name in doc.entity_layout.iter().skip(1) {
        fields.push(match name.as_str() {
            "etype" => etype.unwrap_or_default().to_string(),
            "head" => head.to_string(),
            _ => String::new(),
        });
    }
    // `other` carries every field after the last one we model
    if let (Some(other), Some(last)) = (other, layout.last_known()) {
        fields.truncate(last + 2);
        fields.push(other.to_string());
    }
    let keep = layout.head.map_or(1, |h| h + 2);
    while fields.len() > keep && fields.last().is_some_and(String::is_empty) {
        fields.pop();
    }
    fields.join("-")
}
