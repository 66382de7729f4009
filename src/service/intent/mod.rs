//! Intent parsing service using LLM
//!
//! Converts a free-text meeting request into a structured [`Intent`]. The
//! completion call is bounded by a timeout; any failure falls back to the
//! deterministic local extractor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::config::IntentParserConfig;
use crate::model::intent::{Intent, ParseSource};
use crate::service::intent::fallback::fallback_parse;
use crate::service::intent::prompts::PromptVersion;
use crate::service::intent::validation::parse_intent_response;
use crate::service::llm::CompletionBackend;

pub mod error;
pub mod fallback;
pub mod prompts;
pub mod validation;

pub use error::IntentParseError;

/// Intent together with the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIntent {
    pub intent: Intent,
    pub source: ParseSource,
}

/// Service for parsing free-text requests into intents
pub struct IntentParser {
    backend: Option<Arc<dyn CompletionBackend>>,
    prompt_version: PromptVersion,
    timeout: Duration,
}

impl IntentParser {
    /// Create a parser backed by a completion service
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &IntentParserConfig) -> Self {
        tracing::info!(
            model = %backend.model(),
            prompt_version = %config.prompt_version,
            timeout_secs = config.timeout_secs,
            "Intent parser initialized"
        );
        Self {
            backend: Some(backend),
            prompt_version: config.prompt_version,
            timeout: config.timeout(),
        }
    }

    /// Create a parser that always uses the local extractor
    pub fn fallback_only() -> Self {
        tracing::warn!("Intent parser running without completion backend, using fallback only");
        Self {
            backend: None,
            prompt_version: PromptVersion::default(),
            timeout: Duration::ZERO,
        }
    }

    /// Parse a request. Never fails: completion errors select the fallback.
    pub async fn parse_search_query(&self, user_text: &str) -> ParsedIntent {
        match self.parse_with_llm(user_text).await {
            Ok(intent) => ParsedIntent {
                intent,
                source: ParseSource::Llm,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Intent parsing failed, using fallback extractor");
                ParsedIntent {
                    intent: fallback_parse(user_text),
                    source: ParseSource::Fallback,
                }
            }
        }
    }

    /// Parse a request with the completion service only
    pub async fn parse_with_llm(&self, user_text: &str) -> Result<Intent, IntentParseError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(IntentParseError::NotConfigured)?;

        let start_time = Instant::now();

        tracing::debug!(
            model = %backend.model(),
            prompt_version = %self.prompt_version,
            input_length = user_text.len(),
            "Initiating completion call for intent parsing"
        );

        let call = backend.complete(self.prompt_version.system_prompt(), user_text);
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(
                    model = %backend.model(),
                    elapsed_ms = start_time.elapsed().as_millis(),
                    error = %e,
                    "Completion call for intent parsing failed"
                );
                return Err(e.into());
            }
            Err(_) => {
                tracing::error!(
                    model = %backend.model(),
                    elapsed_ms = start_time.elapsed().as_millis(),
                    "Completion call for intent parsing timed out"
                );
                return Err(IntentParseError::Timeout(self.timeout));
            }
        };

        let validated = parse_intent_response(&response)?;

        if !validated.warnings.is_empty() {
            tracing::warn!(
                warnings = ?validated.warnings,
                "Intent response contained values outside the taxonomy"
            );
        }

        tracing::info!(
            model = %backend.model(),
            elapsed_ms = start_time.elapsed().as_millis(),
            category = ?validated.intent.category,
            confidence = validated.intent.confidence,
            "Intent parsed"
        );

        Ok(validated.intent)
    }
}
