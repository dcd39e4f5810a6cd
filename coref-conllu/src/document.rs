//! Documents, tokens and the token arena
//!
//!     A [`Document`] owns its tokens in an arena addressed by [`TokenId`]. Ids are stable:
//!     removing a token leaves a tombstone behind, so ids held by mentions, dependency edges
//!     or callers never start pointing at a different token.
//!
//!     Positional order is kept separately as a list of ids sorted by
//!     `(sentence, ordinal)`. Every structural edit (insert, remove, relocate) ends with
//!     [`Document::reorder`], which rebuilds that list and the id → position index. Nothing
//!     relies on insertion order or reference identity to decide where a token sits.
//!
//!     Entities own their mentions by value and mentions refer to tokens by id.

use std::fmt;
use std::ops::Index;

use crate::coref::{Entity, Mention};
use crate::error::{ConlluError, Result};
use crate::ordinal::Ordinal;

/// Stable handle of a token in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Head of an enhanced dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadRef {
    Root,
    Token(TokenId),
}

/// One enhanced dependency (a `DEPS` column item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dep {
    pub head: HeadRef,
    pub deprel: String,
}

/// The `MISC` column as ordered `key[=value]` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Misc(Vec<(String, Option<String>)>);

impl Misc {
    pub fn parse(column: &str) -> Self {
        if column == "_" || column.is_empty() {
            return Misc::default();
        }
        Misc(
            column
                .split('|')
                .map(|item| match item.split_once('=') {
                    Some((key, value)) => (key.to_string(), Some(value.to_string())),
                    None => (item.to_string(), None),
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Set `key=value`, replacing an existing value in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        self.0.remove(index).1
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Misc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "_");
        }
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            match value {
                Some(value) => write!(f, "{key}={value}")?,
                None => write!(f, "{key}")?,
            }
        }
        Ok(())
    }
}

/// A token node: an ordinary word or an empty (elided) token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Index of the sentence in [`Document::sentences`]
    pub sentence: usize,
    pub ord: Ordinal,
    pub form: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
    pub feats: String,
    /// Basic head as a word ordinal, `None` for `_` (always `_` on empty tokens).
    pub head: Option<u32>,
    pub deprel: String,
    pub deps: Vec<Dep>,
    pub misc: Misc,
}

impl Token {
    pub fn is_empty(&self) -> bool {
        self.ord.is_empty()
    }

    /// A bare empty token governed by `governor`.
    pub(crate) fn empty_node(sentence: usize, ord: Ordinal, governor: HeadRef) -> Self {
        Token {
            sentence,
            ord,
            form: "_".to_string(),
            lemma: "_".to_string(),
            upos: "_".to_string(),
            xpos: "_".to_string(),
            feats: "_".to_string(),
            head: None,
            deprel: "_".to_string(),
            deps: vec![Dep {
                head: governor,
                deprel: "_".to_string(),
            }],
            misc: Misc::default(),
        }
    }
}

/// Per-sentence material that is not a token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentence {
    /// Comment lines, verbatim (including the leading `#`).
    pub comments: Vec<String>,
    /// Multiword token lines, keyed by the first word they cover.
    pub multiword: Vec<(u32, String)>,
}

pub const DEFAULT_ENTITY_LAYOUT: &[&str] = &["eid", "etype", "head", "other"];

/// One document of the annotation graph.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub sentences: Vec<Sentence>,
    /// Field order of `Entity=` brackets, from `# global.Entity`.
    pub entity_layout: Vec<String>,
    pub(crate) tokens: Vec<Option<Token>>,
    pub(crate) order: Vec<TokenId>,
    pub(crate) positions: Vec<Option<usize>>,
    pub(crate) entities: Vec<Entity>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            sentences: Vec::new(),
            entity_layout: DEFAULT_ENTITY_LAYOUT.iter().map(|s| s.to_string()).collect(),
            tokens: Vec::new(),
            order: Vec::new(),
            positions: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Append a sentence made of ordinary tokens with the given forms.
    ///
    /// Tokens are chained left to right (each word headed by the previous one) so that
    /// head selection has something to work with. Meant for building small graphs by hand.
    pub fn push_sentence(&mut self, forms: &[&str]) -> Vec<TokenId> {
        let sentence = self.sentences.len();
        self.sentences.push(Sentence::default());
        let ids = forms
            .iter()
            .enumerate()
            .map(|(i, form)| {
                let word = i as u32 + 1;
                self.push_token(Token {
                    sentence,
                    ord: Ordinal::from_word(word),
                    form: form.to_string(),
                    lemma: "_".to_string(),
                    upos: "_".to_string(),
                    xpos: "_".to_string(),
                    feats: "_".to_string(),
                    head: Some(word - 1),
                    deprel: if word == 1 { "root" } else { "dep" }.to_string(),
                    deps: Vec::new(),
                    misc: Misc::default(),
                })
            })
            .collect();
        self.reorder();
        ids
    }

    /// Add a token to the arena. Call [`Document::reorder`] once the batch is complete.
    pub(crate) fn push_token(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.tokens.len());
        self.tokens.push(Some(token));
        id
    }

    /// Rebuild positional order after a structural edit.
    pub fn reorder(&mut self) {
        let mut order: Vec<TokenId> = self
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|_| TokenId(i)))
            .collect();
        order.sort_by_key(|id| {
            let token = &self[*id];
            (token.sentence, token.ord)
        });
        self.positions = vec![None; self.tokens.len()];
        for (position, id) in order.iter().enumerate() {
            self.positions[id.0] = Some(position);
        }
        self.order = order;
        // relocated empty tokens change the order inside mentions too
        let positions = &self.positions;
        for mention in self.entities.iter_mut().flat_map(|e| e.mentions.iter_mut()) {
            mention.sort_tokens(positions);
        }
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0).and_then(|t| t.as_ref())
    }

    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.get_mut(id.0).and_then(|t| t.as_mut())
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    /// All live tokens (ordinary and empty) in positional order.
    pub fn token_ids(&self) -> &[TokenId] {
        &self.order
    }

    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &Token)> + '_ {
        self.order.iter().map(move |id| (*id, &self[*id]))
    }

    /// Ordinary tokens only, in positional order.
    pub fn word_ids(&self) -> Vec<TokenId> {
        self.tokens()
            .filter(|(_, t)| !t.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn empty_ids(&self) -> Vec<TokenId> {
        self.tokens()
            .filter(|(_, t)| t.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn token_count(&self) -> usize {
        self.order.len()
    }

    /// Position of a live token in [`Document::token_ids`].
    pub fn position(&self, id: TokenId) -> Option<usize> {
        self.positions.get(id.0).copied().flatten()
    }

    /// Look a token up by sentence and ordinal.
    pub fn find(&self, sentence: usize, ord: Ordinal) -> Option<TokenId> {
        self.order
            .binary_search_by(|id| {
                let token = &self[*id];
                (token.sentence, token.ord).cmp(&(sentence, ord))
            })
            .ok()
            .map(|position| self.order[position])
    }

    /// Syntactic governor: the first enhanced head of an empty token, the basic head of an
    /// ordinary one. `None` for the root or when the head is unknown.
    pub fn governor(&self, id: TokenId) -> Option<TokenId> {
        let token = self.get(id)?;
        if token.is_empty() {
            match token.deps.first()?.head {
                HeadRef::Root => None,
                HeadRef::Token(head) => self.contains(head).then_some(head),
            }
        } else {
            match token.head? {
                0 => None,
                word => self.find(token.sentence, Ordinal::from_word(word)),
            }
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, eid: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.eid == eid)
    }

    pub fn entity_index(&self, eid: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.eid == eid)
    }

    /// Create a new, mention-less entity and return its index.
    pub fn create_entity(&mut self, eid: &str) -> Result<usize> {
        if self.entity_index(eid).is_some() {
            return Err(ConlluError::DuplicateEntity {
                doc: self.id.clone(),
                eid: eid.to_string(),
            });
        }
        self.entities.push(Entity::new(eid));
        Ok(self.entities.len() - 1)
    }

    /// Create a mention of entity `entity` over `tokens`.
    ///
    /// Tokens are put in positional order; the head is the first token whose governor lies
    /// outside the mention (the first token when every governor is inside).
    pub fn create_mention(&mut self, entity: usize, tokens: &[TokenId]) -> Result<&Mention> {
        let tokens = self.normalize_mention_tokens(tokens)?;
        let head = self.pick_head(&tokens);
        self.attach_mention(entity, Mention::new(tokens, head))
    }

    /// Create a mention with an explicit head, which must be one of `tokens`.
    pub fn create_mention_with_head(
        &mut self,
        entity: usize,
        tokens: &[TokenId],
        head: TokenId,
    ) -> Result<&Mention> {
        let tokens = self.normalize_mention_tokens(tokens)?;
        if !tokens.contains(&head) {
            return Err(self.invalid_mention("head is not part of the mention"));
        }
        self.attach_mention(entity, Mention::new(tokens, head))
    }

    /// Drop every entity and the coreference attributes stored in `MISC`.
    pub fn clear_coref(&mut self) {
        self.entities.clear();
        for token in self.tokens.iter_mut().flatten() {
            for key in ["Entity", "SplitAnte", "Bridge"] {
                token.misc.remove(key);
            }
        }
    }

    pub(crate) fn entities_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.entities
    }

    fn attach_mention(&mut self, entity: usize, mention: Mention) -> Result<&Mention> {
        let doc = self.id.clone();
        let entity = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| ConlluError::InvalidMention {
                doc,
                message: format!("no entity at index {entity}"),
            })?;
        entity.mentions.push(mention);
        Ok(&entity.mentions[entity.mentions.len() - 1])
    }

    fn normalize_mention_tokens(&self, tokens: &[TokenId]) -> Result<Vec<TokenId>> {
        if tokens.is_empty() {
            return Err(self.invalid_mention("a mention needs at least one token"));
        }
        if let Some(missing) = tokens.iter().find(|id| !self.contains(**id)) {
            return Err(self.invalid_mention(format!("token {} was removed", missing.0)));
        }
        let mut tokens = tokens.to_vec();
        tokens.sort_by_key(|id| self.position(*id));
        tokens.dedup();
        Ok(tokens)
    }

    fn pick_head(&self, tokens: &[TokenId]) -> TokenId {
        tokens
            .iter()
            .copied()
            .find(|id| match self.governor(*id) {
                Some(governor) => !tokens.contains(&governor),
                None => true,
            })
            .unwrap_or(tokens[0])
    }

    fn invalid_mention(&self, message: impl Into<String>) -> ConlluError {
        ConlluError::InvalidMention {
            doc: self.id.clone(),
            message: message.into(),
        }
    }
}

impl Index<TokenId> for Document {
    type Output = Token;

    /// Panics when the token was removed; use [`Document::get`] when that can happen.
    fn index(&self, id: TokenId) -> &Token {
        match self.get(id) {
            Some(token) => token,
            None => panic!("token {} is not part of document '{}'", id.0, self.id),
        }
    }
}
