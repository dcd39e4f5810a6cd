//! Rendered token sequences
//!
//!     Text and JSON show a document as a flat list of rendered forms. A literal space in a
//!     form becomes `_` and empty tokens are prefixed with `##`. Whether empty tokens appear
//!     at all depends on `zero_mentions`; when they do, they are first shifted behind their
//!     governing tokens so the flat order matches the order a decoder will rebuild.

use std::collections::HashMap;

use coref_conllu::{Document, Mention, Token, TokenId};

pub const EMPTY_PREFIX: &str = "##";

/// Rendered form of one token.
///
/// An empty token whose form is `_` renders as a bare `##`; other empty forms are only kept
/// when `keep_empty_form` is set.
pub fn render_form(token: &Token, keep_empty_form: bool) -> String {
    let form = token.form.replace(' ', "_");
    if !token.is_empty() {
        return form;
    }
    if keep_empty_form && form != "_" {
        format!("{EMPTY_PREFIX}{form}")
    } else {
        EMPTY_PREFIX.to_string()
    }
}

/// Whether a reference word and a graph token denote the same surface token.
///
/// A bare `##` in the reference stands for any empty token; the graph keeps whatever form
/// its empty token has.
pub fn forms_agree(reference: &str, token: &Token) -> bool {
    match reference.strip_prefix(EMPTY_PREFIX) {
        Some(_) if !token.is_empty() => false,
        Some("") => true,
        Some(_) if token.form == "_" => true,
        _ => reference == render_form(token, true),
    }
}

/// The tokens of one document as they are rendered, with their rendered positions.
#[derive(Debug, Clone)]
pub struct Rendering {
    ids: Vec<TokenId>,
    index: HashMap<TokenId, usize>,
}

impl Rendering {
    /// Select the rendered tokens, shifting empty tokens first when they are rendered.
    pub fn prepare(doc: &mut Document, zero_mentions: bool) -> Self {
        let ids = if zero_mentions {
            doc.shift_empty_tokens();
            doc.token_ids().to_vec()
        } else {
            doc.word_ids()
        };
        let index = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Rendering { ids, index }
    }

    pub fn ids(&self) -> &[TokenId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: TokenId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// The reduced span of `mention` as an inclusive `(start, end)` range of rendered
    /// positions, or `None` when none of its tokens are rendered.
    pub fn mention_range(&self, doc: &Document, mention: &Mention) -> Option<(usize, usize)> {
        let mut positions = mention
            .reduced(doc)
            .into_iter()
            .filter_map(|id| self.position(id));
        let start = positions.next()?;
        let end = positions.last().unwrap_or(start);
        Some((start, end))
    }

    pub fn forms(&self, doc: &Document, keep_empty_form: bool) -> Vec<String> {
        self.ids
            .iter()
            .map(|id| render_form(&doc[*id], keep_empty_form))
            .collect()
    }
}
