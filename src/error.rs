//! Application error type and its HTTP representation.
//!
//! Every failure on a request path ends up as an [`AppError`], which renders
//! one of three wire bodies:
//!
//! | Variant                          | Status | Body                                                   |
//! |----------------------------------|--------|--------------------------------------------------------|
//! | [`AppError::InvalidUrl`]         | 200    | `{ "error": "invalid url" }`                           |
//! | [`AppError::NotFound`]           | 200    | `{ "error": "No short URL found for the given input" }` |
//! | `Conflict` / `Internal`          | 500    | `{ "error": "server error" }`                          |
//!
//! Invalid-url and not-found answers keep status 200 so existing clients of
//! the service keep working. Internal details are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

pub const INVALID_URL_MESSAGE: &str = "invalid url";
pub const NOT_FOUND_MESSAGE: &str = "No short URL found for the given input";
pub const SERVER_ERROR_MESSAGE: &str = "server error";

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed URL or a host that does not resolve.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// No mapping exists for the requested short id.
    #[error("no short url found for input {0:?}")]
    NotFound(String),

    /// A store-level uniqueness constraint rejected an insert.
    #[error("conflict: {message}")]
    Conflict { message: String, details: Value },

    /// Store unavailable or any other unexpected failure.
    #[error("internal error: {message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl(reason.into())
    }

    pub fn not_found(input: impl Into<String>) -> Self {
        Self::NotFound(input.into())
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and public message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUrl(_) => (StatusCode::OK, INVALID_URL_MESSAGE),
            AppError::NotFound(_) => (StatusCode::OK, NOT_FOUND_MESSAGE),
            AppError::Conflict { .. } | AppError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            AppError::Conflict { message, details } | AppError::Internal { message, details } => {
                tracing::error!(error = %message, details = %details, "Request failed");
            }
            other => tracing::debug!(error = %other, "Request rejected"),
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    AppError::internal("Database error", json!({ "reason": e.to_string() }))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}
