use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type shared by the sync commands and the webhook relay.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required credential or setting is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remote API answered with a non-success status.
    #[error("{service} API error (status {status}): {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the failure came back from a remote API as HTTP 401.
    pub fn is_upstream_unauthorized(&self) -> bool {
        matches!(self, AppError::Upstream { status: 401, .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid signature".to_string(),
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "Server configuration error".to_string(),
                )
            }
            AppError::Upstream {
                service,
                status,
                message,
            } => {
                tracing::error!("{service} API error {status}: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    format!("{service} API error: {status}"),
                )
            }
            // Webhook runs only reach this when the remote document is gone,
            // which the caller sees as a failed run rather than a missing route.
            AppError::NotFound(msg) => {
                tracing::error!("Not found: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NOT_FOUND",
                    msg.clone(),
                )
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "A file system error occurred".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "JSON_ERROR",
                    "Webhook processing failed".to_string(),
                )
            }
            AppError::Http(e) => {
                tracing::error!("HTTP error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "HTTP_ERROR",
                    "Webhook processing failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
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
