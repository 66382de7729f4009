//! Error types for intent parsing

use std::time::Duration;

use thiserror::Error;

/// Reason the completion-based parse failed.
///
/// Never surfaced to callers of `parse_search_query`; it selects the fallback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntentParseError {
    #[error("No completion backend configured")]
    NotConfigured,

    #[error("Completion call failed: {0}")]
    Completion(#[from] crate::service::llm::LlmError),

    #[error("Completion call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}
