//! Error types for the ranker model

use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading and invoking the ranker model
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("Model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize model artifact: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid calibration file {}: {reason}", path.display())]
    Calibration { path: PathBuf, reason: String },

    #[error("Model not loaded. Call load() first.")]
    ModelNotLoaded,

    #[error("Feature shape mismatch: expected {expected} features, got {actual}")]
    FeatureShapeMismatch { expected: usize, actual: usize },
}
