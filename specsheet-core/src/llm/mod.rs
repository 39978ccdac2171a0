//! Language model clients
//!
//! The pipeline only needs one capability from a model: given a system
//! message and a user message, return the text of the first completion.
//! [`CompletionClient`] captures that, so the batch driver can run against
//! the real endpoint or a deterministic stub.

pub mod openai;

pub use openai::OpenAiClient;

use crate::error::DocumentResult;

/// Chat-completion capability used by the batch driver.
pub trait CompletionClient {
    /// Send one system + user exchange, return the first choice's content.
    ///
    /// Implementations do not retry; any failure is reported as
    /// [`DocumentError::Completion`](crate::error::DocumentError::Completion).
    fn complete(&self, system: &str, user: &str) -> DocumentResult<String>;

    /// Model identifier for logging
    fn model(&self) -> &str;
}
