//! Error types for graph loading, saving and editing

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConlluError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConlluError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CoNLL-U line
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Malformed or inconsistent `Entity=` annotation
    #[error("document '{doc}': {message}")]
    Entity { doc: String, message: String },

    #[error("document '{doc}' already has an entity '{eid}'")]
    DuplicateEntity { doc: String, eid: String },

    #[error("document '{doc}': invalid mention: {message}")]
    InvalidMention { doc: String, message: String },
}

impl ConlluError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ConlluError::Parse {
            line,
            message: message.into(),
        }
    }
}
