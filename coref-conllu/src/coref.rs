//! Entities and mentions
//!
//!     A mention is a set of tokens of one document. Its *subspans* are the maximal runs of
//!     tokens that are adjacent in positional order, so a mention over words 1, 2, 4 and 5 has
//!     the subspans `1-2` and `4-5` and renders as `1-2,4-5`. Empty tokens the mention does
//!     not include never split a run: `1-2` stays one subspan when `1.1` sits between.
//!
//!     Formats that cannot express discontinuity use [`Mention::reduced`]: the one subspan
//!     holding the head token. Everything else in the mention is dropped. Reduction never
//!     modifies the stored mention.

use crate::document::{Document, TokenId};

/// A coreference cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub eid: String,
    pub etype: Option<String>,
    pub mentions: Vec<Mention>,
}

impl Entity {
    pub fn new(eid: impl Into<String>) -> Self {
        Entity {
            eid: eid.into(),
            etype: None,
            mentions: Vec::new(),
        }
    }
}

/// True when only empty tokens lie strictly between two positions.
fn bridged(doc: &Document, last: usize, position: usize) -> bool {
    position > last
        && doc.token_ids()[last + 1..position]
            .iter()
            .all(|id| doc[*id].is_empty())
}

/// One occurrence of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    tokens: Vec<TokenId>,
    pub head: TokenId,
    /// Trailing CorefUD fields after `head`, kept verbatim.
    pub other: Option<String>,
}

impl Mention {
    /// `tokens` must already be in positional order and contain `head`.
    pub(crate) fn new(tokens: Vec<TokenId>, head: TokenId) -> Self {
        Mention {
            tokens,
            head,
            other: None,
        }
    }

    /// Tokens in positional order.
    pub fn tokens(&self) -> &[TokenId] {
        &self.tokens
    }

    pub fn subspans(&self, doc: &Document) -> Vec<Vec<TokenId>> {
        let mut subspans: Vec<Vec<TokenId>> = Vec::new();
        let mut last_position = None;
        for id in &self.tokens {
            let Some(position) = doc.position(*id) else {
                continue;
            };
            match (subspans.last_mut(), last_position) {
                (Some(current), Some(last)) if bridged(doc, last, position) => current.push(*id),
                _ => subspans.push(vec![*id]),
            }
            last_position = Some(position);
        }
        subspans
    }

    pub fn is_discontinuous(&self, doc: &Document) -> bool {
        self.subspans(doc).len() > 1
    }

    /// The contiguous subspan containing the head.
    ///
    /// Falls back to the first subspan if the head is missing, which only happens when the
    /// head token was removed from the document.
    pub fn reduced(&self, doc: &Document) -> Vec<TokenId> {
        let mut subspans = self.subspans(doc);
        match subspans.iter().position(|s| s.contains(&self.head)) {
            Some(index) => subspans.swap_remove(index),
            None if !subspans.is_empty() => subspans.swap_remove(0),
            None => Vec::new(),
        }
    }

    /// CoNLL-U style span string such as `3`, `1-2` or `1-2,4-5`.
    pub fn span(&self, doc: &Document) -> String {
        self.subspans(doc)
            .iter()
            .map(|subspan| {
                let first = doc[subspan[0]].ord;
                let last = doc[subspan[subspan.len() - 1]].ord;
                if subspan.len() == 1 {
                    first.to_string()
                } else {
                    format!("{first}-{last}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    pub(crate) fn sort_tokens(&mut self, positions: &[Option<usize>]) {
        self.tokens
            .sort_by_key(|id| positions.get(id.index()).copied().flatten());
    }

    /// Remove a token, moving the head to the first remaining token if needed.
    pub(crate) fn detach(&mut self, id: TokenId) {
        self.tokens.retain(|t| *t != id);
        if self.head == id {
            if let Some(first) = self.tokens.first() {
                self.head = *first;
            }
        }
    }
}
