//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use locker_metadata::MetadataError;
use serde::Serialize;

/// Message for every rejected session, whatever the reason.
const NOT_LOGGED_IN: &str = "not logged in";

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) => "internal_error",
            Self::Metadata(e) => match e {
                MetadataError::Validation(_) => "validation_failed",
                MetadataError::AlreadyExists(_) => "already_exists",
                MetadataError::InvalidCredentials => "invalid_credentials",
                // Both token failures look the same to the client.
                MetadataError::MissingToken | MetadataError::InvalidToken => "not_logged_in",
                MetadataError::NotFound(_) => "not_found",
                MetadataError::Constraint(_) => "constraint_violation",
                MetadataError::Config(_) => "internal_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Metadata(e) => match e {
                MetadataError::Validation(_)
                | MetadataError::AlreadyExists(_)
                | MetadataError::Constraint(_) => StatusCode::BAD_REQUEST,
                MetadataError::InvalidCredentials
                | MetadataError::MissingToken
                | MetadataError::InvalidToken => StatusCode::FORBIDDEN,
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                MetadataError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// The message shown to the client.
    pub fn message(&self) -> String {
        match self {
            Self::Metadata(MetadataError::Validation(message)) => message.clone(),
            Self::Metadata(MetadataError::InvalidCredentials) => {
                "username/password combination incorrect".to_string()
            }
            Self::Metadata(MetadataError::MissingToken | MetadataError::InvalidToken) => {
                NOT_LOGGED_IN.to_string()
            }
            Self::Metadata(MetadataError::Config(_)) | Self::Internal(_) => {
                "internal server error".to_string()
            }
            Self::Metadata(MetadataError::NotFound(what)) => format!("{what} not found"),
            Self::Metadata(MetadataError::AlreadyExists(what)) => {
                format!("{what} already exists")
            }
            Self::Metadata(e) => e.to_string(),
            Self::BadRequest(message) | Self::Forbidden(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.message(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
