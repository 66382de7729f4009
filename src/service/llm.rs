//! Shared LLM client and completion backend
//!
//! Provides the single network-dependent operation of the ranking pipeline:
//! one system instruction plus one user message in, raw response text out.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use thiserror::Error;

use crate::model::config::IntentParserConfig;

/// Error type for completion calls
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("Failed to create OpenAI client: {0}")]
    Client(String),

    #[error("Completion request failed: {0}")]
    Completion(String),
}

/// Text-completion service used by the intent parser
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one system instruction and one user message, return the raw reply
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, LlmError> {
        let client = openai::Client::new(api_key).map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying OpenAI client
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}

/// Chat-completion backend on top of [`LlmClient`]
pub struct OpenAiCompletion {
    llm_client: LlmClient,
    model: String,
    temperature: f64,
    max_tokens: u64,
}

impl OpenAiCompletion {
    pub fn new(llm_client: LlmClient, config: &IntentParserConfig) -> Self {
        Self {
            llm_client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompletion {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let agent = self
            .llm_client
            .openai_client()
            .agent(&self.model)
            .preamble(system)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();

        agent
            .prompt(user)
            .await
            .map_err(|e| LlmError::Completion(e.to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
