//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::service::pipeline::RankingError;
use crate::service::ranker::ModelError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Candidate features do not fit the model (400)
    #[error("Invalid features: {0}")]
    InvalidFeatures(String),

    /// Model not loaded (503)
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidFeatures(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::InvalidFeatures(_) => "invalid_features",
            ApiError::ModelUnavailable(_) => "model_unavailable",
            ApiError::Internal(_) => "internal_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<RankingError> for ApiError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Model(e @ ModelError::ModelNotLoaded) => {
                ApiError::ModelUnavailable(e.to_string())
            }
            RankingError::Model(e @ ModelError::FeatureShapeMismatch { .. }) => {
                ApiError::InvalidFeatures(e.to_string())
            }
            RankingError::Model(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_map_to_status_codes() {
        let unavailable: ApiError = RankingError::Model(ModelError::ModelNotLoaded).into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let shape: ApiError = RankingError::Model(ModelError::FeatureShapeMismatch {
            expected: 4,
            actual: 2,
        })
        .into();
        assert_eq!(shape.status_code(), StatusCode::BAD_REQUEST);

        let other: ApiError =
            RankingError::Model(ModelError::InvalidModel("broken".to_string())).into();
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
