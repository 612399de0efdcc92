//! Marketplace error types with HTTP status code mapping.
//!
//! [`MarketError`] is the central error type. Each variant maps to a specific
//! HTTP status code and structured JSON error response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape, so `body.error` is always the
/// human-readable message:
/// ```json
/// {
///   "error": "Capacity exceeded",
///   "details": "Expected attendees (150) exceed venue capacity (100)",
///   "code": 1001
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Numeric error code (see code ranges on [`MarketError`]).
    pub code: u32,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                     |
/// |-----------|--------------------|---------------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request / 422           |
/// | 2000–2099 | Not Found          | 404 Not Found                   |
/// | 2100–2199 | Access             | 401 Unauthorized / 403 Forbidden |
/// | 3000–3999 | Server             | 500 Internal Server Error       |
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Malformed or missing request input.
    #[error("{message}")]
    Validation {
        /// Short summary, e.g. `"Missing required fields"`.
        message: String,
        /// Optional explanation, e.g. the list of missing fields.
        details: Option<String>,
    },

    /// Registration input rejected by the identity store.
    #[error("{0}")]
    Unprocessable(String),

    /// Referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Credential missing, invalid, or bound to a vanished user.
    #[error("{0}")]
    Unauthenticated(String),

    /// Caller lacks the role or ownership required.
    #[error("{0}")]
    Forbidden(String),

    /// Store or file system failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Validation failure without details.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Validation failure with an explanation.
    #[must_use]
    pub fn validation_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation { .. } => 1001,
            Self::Unprocessable(_) => 1002,
            Self::NotFound(_) => 2001,
            Self::Unauthenticated(_) => 2101,
            Self::Forbidden(_) => 2102,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Validation { details, .. } => details.clone(),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for MarketError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for MarketError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_with("Invalid request body", rejection.body_text())
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
            code: self.error_code(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
