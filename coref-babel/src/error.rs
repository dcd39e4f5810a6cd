//! Error types for format parsing and transcoding

use std::fmt;

use coref_conllu::ConlluError;
use thiserror::Error;

/// Errors a [`Format`](crate::format::Format) raises while reading or writing records.
#[derive(Debug)]
pub enum FormatError {
    /// JSON (de)serialization failed
    Json(serde_json::Error),
    /// The format does not implement the requested direction
    NotSupported(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Json(err) => write!(f, "JSON error: {err}"),
            FormatError::NotSupported(msg) => write!(f, "Not supported: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::Json(err)
    }
}

/// The two representations of a batch do not line up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("expected {expected} documents, found {found}")]
    DocumentCount { expected: usize, found: usize },

    #[error("document '{doc}': expected {expected} tokens, found {found}")]
    TokenCount {
        doc: String,
        expected: usize,
        found: usize,
    },
}

/// Fatal errors of a transcoding run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TranscodeError {
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error("document '{doc}': mention offsets [{start}, {end}] do not fit {tokens} tokens")]
    InvalidOffsets {
        doc: String,
        start: usize,
        end: usize,
        tokens: usize,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Conllu(#[from] ConlluError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
