use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compensation::CompensationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Compensation error: {0}")]
    Compensation(#[from] CompensationError),

    /// Body was missing, not JSON, or did not match the request type.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidBody(rejection) => {
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
            AppError::InvalidPath(rejection) => {
                (rejection.status(), "VALIDATION_ERROR", rejection.body_text())
            }
            AppError::Compensation(CompensationError::UnknownLevel(level)) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_LEVEL",
                format!("Unknown level code '{level}'"),
            ),
            AppError::Compensation(CompensationError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Compensation(e @ CompensationError::InvalidTable(_)) => {
                tracing::error!("Reference table error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_level_maps_to_404() {
        let resp = AppError::from(CompensationError::UnknownLevel("L42".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let resp =
            AppError::from(CompensationError::InvalidInput("bad".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_table_maps_to_500() {
        let resp =
            AppError::from(CompensationError::InvalidTable("broken".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let resp = AppError::Validation("role cannot be empty".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
