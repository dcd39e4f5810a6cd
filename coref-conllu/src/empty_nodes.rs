//! Empty-token placement
//!
//!     Empty tokens sit in the slot of an integer ordinal: `5.1`, `5.2`, … follow word 5. The
//!     operations here keep every slot packed (`k` runs 1, 2, 3 … with no gaps) and re-sort the
//!     document after each edit, so iteration order always matches ordinal order.
//!
//!     - insert: new empty token at the next free increment after a word
//!     - shift: move an empty token into the slot of its governing token
//!     - remove: delete an empty token, detach what referenced it, close the gap
//!
//!     All slots are sentence-scoped, as CoNLL-U ordinals are.

use tracing::debug;

use crate::document::{Document, HeadRef, Token, TokenId};
use crate::ordinal::Ordinal;

impl Document {
    /// Create an empty token right after the ordinary token `after`.
    ///
    /// The new token goes behind any empty tokens already in that slot and is governed by
    /// `after`. Returns `None` if `after` is not a live ordinary token.
    pub fn insert_empty_after(&mut self, after: TokenId) -> Option<TokenId> {
        let token = self.get(after)?;
        if token.is_empty() {
            return None;
        }
        let (sentence, word) = (token.sentence, token.ord.word);
        Some(self.insert_empty(sentence, word, HeadRef::Token(after)))
    }

    /// Create an empty token before the first word of `sentence` (slot 0), governed by the
    /// root.
    pub fn insert_empty_at_start(&mut self, sentence: usize) -> TokenId {
        self.insert_empty(sentence, 0, HeadRef::Root)
    }

    fn insert_empty(&mut self, sentence: usize, word: u32, governor: HeadRef) -> TokenId {
        let ord = Ordinal::new(word, self.free_increment(sentence, word));
        let id = self.push_token(Token::empty_node(sentence, ord, governor));
        self.reorder();
        id
    }

    /// Delete an empty token.
    ///
    /// Dependency edges pointing at it are dropped, mentions lose it (and vanish if it was
    /// their only token), and later empty tokens of the same slot move down one increment.
    /// Returns `false` without touching anything when `id` is already gone or not empty.
    pub fn remove_empty(&mut self, id: TokenId) -> bool {
        let Some(token) = self.get(id) else {
            return false;
        };
        if !token.is_empty() {
            return false;
        }
        let (sentence, ord) = (token.sentence, token.ord);

        for other in self.tokens.iter_mut().flatten() {
            other.deps.retain(|dep| dep.head != HeadRef::Token(id));
        }
        for entity in self.entities_mut() {
            for mention in &mut entity.mentions {
                mention.detach(id);
            }
            entity.mentions.retain(|m| !m.tokens().is_empty());
        }
        self.tokens[id.0] = None;
        self.repack(sentence, ord);
        self.reorder();
        true
    }

    /// Move an empty token into the slot of its governing token.
    ///
    /// Nothing happens when it already sits there, is not an empty token, or has no
    /// enhanced dependency to name a governor. Returns whether the token moved.
    pub fn shift_empty(&mut self, id: TokenId) -> bool {
        let Some(token) = self.get(id) else {
            return false;
        };
        if !token.is_empty() {
            return false;
        }
        let (sentence, ord) = (token.sentence, token.ord);
        let Some(dep) = token.deps.first() else {
            debug!(doc = %self.id, ord = %ord, "empty token without dependencies stays in place");
            return false;
        };
        let target = match dep.head {
            HeadRef::Root => 0,
            HeadRef::Token(governor) => match self.get(governor) {
                Some(governor) => governor.ord.floor(),
                None => return false,
            },
        };
        if ord.floor() == target {
            return false;
        }

        let moved = Ordinal::new(target, self.free_increment(sentence, target));
        if let Some(token) = self.get_mut(id) {
            token.ord = moved;
        }
        self.repack(sentence, ord);
        self.reorder();
        true
    }

    /// Apply [`Document::shift_empty`] to every empty token, in positional order.
    ///
    /// Idempotent: after one pass every empty token sits in its governor's slot. Returns the
    /// number of relocated tokens.
    pub fn shift_empty_tokens(&mut self) -> usize {
        let mut moved = 0;
        for id in self.empty_ids() {
            if self.shift_empty(id) {
                moved += 1;
            }
        }
        moved
    }

    /// Smallest increment `k >= 1` not used in slot `word` of `sentence`.
    fn free_increment(&self, sentence: usize, word: u32) -> u32 {
        let mut used: Vec<u32> = self
            .tokens
            .iter()
            .flatten()
            .filter(|t| t.sentence == sentence && t.ord.word == word && t.is_empty())
            .map(|t| t.ord.empty)
            .collect();
        used.sort_unstable();
        let mut k = 1;
        for value in used {
            if value == k {
                k += 1;
            } else if value > k {
                break;
            }
        }
        k
    }

    /// Close the gap left at `vacated`: empty tokens above it in the same slot move down.
    fn repack(&mut self, sentence: usize, vacated: Ordinal) {
        for token in self.tokens.iter_mut().flatten() {
            if token.sentence == sentence
                && token.ord.word == vacated.word
                && token.ord.empty > vacated.empty
            {
                token.ord.empty -= 1;
            }
        }
    }
}
