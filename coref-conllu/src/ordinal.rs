//! Token ordinals
//!
//!     CoNLL-U numbers the ordinary tokens of a sentence 1, 2, 3 … and slots empty tokens
//!     between them as `3.1`, `3.2`. An [`Ordinal`] keeps both parts as integers, so `3.10`
//!     sorts after `3.9` and no ordering decision ever depends on float rounding.
//!
//!     Word 0 is the slot before the first ordinary token. Only empty tokens live there
//!     (`0.1`, `0.2`, …).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Position of a token inside its sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ordinal {
    /// Integer part: the ordinary token this slot belongs to.
    pub word: u32,
    /// Empty-token increment, 0 for ordinary tokens.
    pub empty: u32,
}

impl Ordinal {
    pub const fn from_word(word: u32) -> Self {
        Ordinal { word, empty: 0 }
    }

    pub const fn new(word: u32, empty: u32) -> Self {
        Ordinal { word, empty }
    }

    pub fn is_empty(&self) -> bool {
        self.empty > 0
    }

    /// The integer ordinal of the slot
    pub fn floor(&self) -> u32 {
        self.word
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty == 0 {
            write!(f, "{}", self.word)
        } else {
            write!(f, "{}.{}", self.word, self.empty)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid token ordinal '{0}'")]
pub struct ParseOrdinalError(pub String);

impl FromStr for Ordinal {
    type Err = ParseOrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseOrdinalError(s.to_string());
        match s.split_once('.') {
            None => s.parse().map(Ordinal::from_word).map_err(|_| err()),
            Some((word, empty)) => {
                let word = word.parse().map_err(|_| err())?;
                let empty: u32 = empty.parse().map_err(|_| err())?;
                if empty == 0 {
                    return Err(err());
                }
                Ok(Ordinal::new(word, empty))
            }
        }
    }
}
