//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup failures
//! and `HttpError` for failures returned from request handlers.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// The primary error type for starting the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure applying the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//=========================================================================================
// Handler Errors
//=========================================================================================

/// One failed field check in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldIssue {
    /// Name of the offending field.
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Errors a handler can answer with, each mapped to one status code.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// 400 with per-field detail.
    #[error("Validation error")]
    Validation(Vec<FieldIssue>),

    /// 400 with a single message.
    #[error("{0}")]
    BadRequest(String),

    /// 401. The message stays generic so nothing about the account leaks.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// 500. `error` carries the underlying error text.
    #[error("{message}: {error}")]
    Internal { message: String, error: String },
}

impl HttpError {
    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        HttpError::Internal {
            message: message.into(),
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Validation(_) | HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            HttpError::Validation(issues) => ErrorBody {
                message: "Validation error".to_string(),
                errors: Some(issues),
                error: None,
            },
            HttpError::BadRequest(message)
            | HttpError::Unauthorized(message)
            | HttpError::NotFound(message) => ErrorBody {
                message,
                errors: None,
                error: None,
            },
            HttpError::Internal { message, error } => ErrorBody {
                message,
                errors: None,
                error: Some(error),
            },
        };
        (status, Json(body)).into_response()
    }
}
