//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use crate::model::Config;
use crate::service::adjuster::RuleTableError;
use crate::service::ranker::ModelError;
use crate::service::{
    IntentAdjuster, IntentParser, KeywordIntentClassifier, LlmClient, OpenAiCompletion,
    RankerModel, RankingPipeline,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Loaded ranker model, read-only after startup
    pub model: Arc<RankerModel>,
    /// Ranking pipeline sharing the model
    pub pipeline: Arc<RankingPipeline>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Configuration sanity checks
    /// 2. Ranker model and calibration loading (fatal on failure)
    /// 3. Rule table validation (fatal on failure)
    /// 4. LLM client initialization (optional, requires OPENAI_API_KEY)
    /// 5. Pipeline construction
    pub fn new(config: Config) -> Result<Self, AppError> {
        if config.intent_parser.timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "intent_parser.timeout_secs must be greater than zero".to_string(),
            ));
        }

        let mut model = RankerModel::new(
            config.ranker.model_path.clone(),
            config.ranker.calibration_path.clone(),
        );
        model.load()?;
        let model = Arc::new(model);

        let adjuster = IntentAdjuster::new()?;

        let parser = Self::build_intent_parser(&config);

        let pipeline = Arc::new(RankingPipeline::new(
            Arc::clone(&model),
            parser,
            Arc::new(KeywordIntentClassifier),
            adjuster,
        ));

        Ok(Self { model, pipeline })
    }

    /// Build the intent parser; without a usable API key it runs on the
    /// fallback extractor alone
    fn build_intent_parser(config: &Config) -> IntentParser {
        let api_key = match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                tracing::warn!("OPENAI_API_KEY not set, intent parsing limited to fallback");
                return IntentParser::fallback_only();
            }
        };

        match LlmClient::new(&api_key) {
            Ok(llm_client) => {
                let backend = OpenAiCompletion::new(llm_client, &config.intent_parser);
                IntentParser::new(Arc::new(backend), &config.intent_parser)
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM client unavailable, intent parsing limited to fallback");
                IntentParser::fallback_only()
            }
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Model artifact missing or unreadable
    #[error("Model initialization failed: {0}")]
    ModelLoad(#[from] ModelError),

    /// Rule table does not fit the taxonomy
    #[error("Rule table initialization failed: {0}")]
    RuleTable(#[from] RuleTableError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
