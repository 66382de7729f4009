use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::service::intent::prompts::PromptVersion;

const ENV_CONFIG_PATH: &str = "RANKER_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_MODEL_PATH: &str = "RANKER_MODEL_PATH";
const ENV_CALIBRATION_PATH: &str = "RANKER_CALIBRATION_PATH";
const ENV_PARSER_MODEL: &str = "INTENT_PARSER_MODEL";
const ENV_PARSER_TIMEOUT: &str = "INTENT_PARSER_TIMEOUT_SECS";
const ENV_PROMPT_VERSION: &str = "INTENT_PROMPT_VERSION";

const DEFAULT_MODEL_PATH: &str = "models/lightgbm_ranker.json";
const DEFAULT_PARSER_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_MAX_TOKENS: u64 = 500;

/// Ranker model artifact locations
#[derive(Debug, Clone, Deserialize)]
pub struct RankerConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Optional; a missing file is not an error
    #[serde(default)]
    pub calibration_path: Option<PathBuf>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            calibration_path: None,
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

/// Natural-language intent parser settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntentParserConfig {
    /// Completion model name
    pub model: String,
    /// Upper bound for one completion call
    pub timeout_secs: u64,
    pub prompt_version: PromptVersion,
    pub temperature: f64,
    pub max_tokens: u64,
}

impl Default for IntentParserConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_PARSER_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            prompt_version: PromptVersion::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl IntentParserConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub ranker: RankerConfig,
    #[serde(default)]
    pub intent_parser: IntentParserConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub ranker: RankerConfig,
    pub intent_parser: IntentParserConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranker: RankerConfig::default(),
            intent_parser: IntentParserConfig::default(),
            port: 8000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file.
    ///
    /// Environment variables take precedence over the YAML file.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let ConfigFile {
            mut ranker,
            mut intent_parser,
        } = Self::load_config_file(&config_path).unwrap_or_default();

        if let Ok(path) = std::env::var(ENV_MODEL_PATH) {
            ranker.model_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(ENV_CALIBRATION_PATH) {
            ranker.calibration_path = Some(PathBuf::from(path));
        }
        if let Ok(model) = std::env::var(ENV_PARSER_MODEL) {
            intent_parser.model = model;
        }
        if let Some(secs) = std::env::var(ENV_PARSER_TIMEOUT)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            intent_parser.timeout_secs = secs;
        }
        if let Ok(version) = std::env::var(ENV_PROMPT_VERSION) {
            match PromptVersion::parse(&version) {
                Some(v) => intent_parser.prompt_version = v,
                None => tracing::warn!(
                    value = %version,
                    "Unknown prompt version, keeping {}",
                    intent_parser.prompt_version
                ),
            }
        }

        Self {
            ranker,
            intent_parser,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(path, &contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(path: &Path, contents: &str) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
