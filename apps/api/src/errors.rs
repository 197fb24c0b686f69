use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingestion::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A required earlier step has not happened yet. Raised before any Gateway call.
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("No API credential has been provided for this session")]
    MissingCredential,

    /// Transport, parse or shape failure of one Gateway unit of work.
    #[error("{operation} failed: {reason}")]
    Gateway { operation: String, reason: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn gateway(operation: impl Into<String>, reason: impl ToString) -> Self {
        AppError::Gateway {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// A file the Gateway never saw is the client's problem; anything after that is a
    /// Gateway failure of the named operation.
    pub fn extraction(operation: impl Into<String>, err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedDocument(msg) => AppError::Validation(msg),
            other => AppError::gateway(operation, other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingPrerequisite(msg) => (
                StatusCode::PRECONDITION_FAILED,
                "MISSING_PREREQUISITE",
                msg.clone(),
            ),
            AppError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIAL",
                "Provide an API key for this session before running extraction".to_string(),
            ),
            AppError::Gateway { operation, reason } => {
                tracing::error!("Gateway error during {operation}: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    format!("{operation} failed. No partial result was kept."),
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
