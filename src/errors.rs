use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::external::history_source::HistorySourceError;

/// Enumerated failure causes for every public operation. Note that model
/// unavailability is deliberately absent: a missing forecast model routes to
/// the statistical fallback and is never an error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Computation failed: {0}")]
    Computation(String),
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limited by data provider")]
    RateLimited,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InsufficientData(_) | AppError::Computation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        // Every failure renders the same envelope the success paths carry,
        // with success: false and a short human-readable message.
        let body = Json(json!({
            "error": self.to_string(),
            "success": false,
        }));

        (status, body).into_response()
    }
}

impl From<HistorySourceError> for AppError {
    fn from(value: HistorySourceError) -> Self {
        match value {
            HistorySourceError::RateLimited => AppError::RateLimited,
            other => AppError::Upstream(other.to_string()),
        }
    }
}
