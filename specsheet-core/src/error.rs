//! Per-document failures.
//!
//! Each variant is caught by the batch driver, logged through the
//! [`Reporter`](crate::report::Reporter) and resolved by skipping the
//! document. Nothing here aborts a batch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// The PDF could not be read or decoded
    #[error("{0}")]
    Extraction(String),

    /// The PDF decoded but no page carried any text
    #[error("no extractable text on any page")]
    NoText,

    /// The chat-completion request failed or returned nothing usable
    #[error("{0}")]
    Completion(String),

    /// The model's answer was not a JSON object, even after fence stripping
    #[error("{message}")]
    ResponseParse { message: String, raw: String },
}

impl DocumentError {
    pub fn kind(&self) -> SkipKind {
        match self {
            DocumentError::Extraction(_) | DocumentError::NoText => SkipKind::Extraction,
            DocumentError::Completion(_) => SkipKind::Completion,
            DocumentError::ResponseParse { .. } => SkipKind::ResponseParse,
        }
    }
}

/// Which pipeline stage caused a document to be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipKind {
    Extraction,
    Completion,
    ResponseParse,
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
