//! Error type system for the authentication backend
//!
//! This module provides:
//! - The application-wide error enum and its HTTP status mapping
//! - Field-level validation errors
//! - The JSON error body returned to clients, tagged with the request trace ID

use crate::api::middleware::current_trace_id;
use crate::auth::jwt::TokenError;
use crate::db::repository::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the authentication backend
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("No such user with the given email")]
    NoSuchUser,

    #[error("Invalid password for the given email")]
    InvalidPassword,

    #[error("{0}")]
    Unauthorized(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,

            AppError::EmailAlreadyRegistered => StatusCode::BAD_REQUEST,

            AppError::NoSuchUser | AppError::InvalidPassword | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }

            AppError::StoreError(_) | AppError::TokenError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::StoreError(_) => "StoreError",
            AppError::TokenError(_) => "TokenError",
            AppError::Internal(_) => "InternalError",
            AppError::ValidationError(_) => "ValidationError",
            AppError::EmailAlreadyRegistered => "EmailAlreadyRegistered",
            AppError::NoSuchUser => "NoSuchUser",
            AppError::InvalidPassword => "InvalidPassword",
            AppError::Unauthorized(_) => "Unauthorized",
        }
    }

    /// Shorthand for a 401 raised by the access guard
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => AppError::Unauthorized("Invalid or expired token".to_string()),
            TokenError::Encoding(msg) => AppError::TokenError(msg),
        }
    }
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collection of field-level validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors for a request body that could not be parsed at all
    pub fn body(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add("body", message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(())` when nothing was collected, otherwise the errors as an `AppError`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level details for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Trace ID of the request that failed
    pub trace_id: String,
}

impl ErrorResponse {
    pub fn from_error_with_trace_id(error: &AppError, trace_id: String) -> Self {
        let details = match error {
            AppError::ValidationError(errors) => serde_json::to_value(errors.fields()).ok(),
            _ => None,
        };

        Self {
            error: error.error_type().to_string(),
            message: client_message(error),
            details,
            trace_id,
        }
    }
}

/// Message shown to clients; server-side failures stay generic
fn client_message(error: &AppError) -> String {
    match error {
        AppError::StoreError(_) | AppError::TokenError(_) | AppError::Internal(_) => {
            "Internal server error".to_string()
        }
        AppError::ValidationError(_) => "Request validation failed".to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let trace_id = current_trace_id().unwrap_or_else(|| Uuid::new_v4().to_string());
        let error_response = ErrorResponse::from_error_with_trace_id(&self, trace_id);

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError(ValidationErrors::body("bad")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::EmailAlreadyRegistered.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NoSuchUser.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidPassword.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::unauthorized("Not authenticated").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::StoreError(StoreError::Pool("exhausted".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_signin_failures_keep_distinct_messages() {
        assert_eq!(AppError::NoSuchUser.to_string(), "No such user with the given email");
        assert_eq!(
            AppError::InvalidPassword.to_string(),
            "Invalid password for the given email"
        );
    }

    #[test]
    fn test_invalid_token_collapses_to_unauthorized() {
        let err: AppError = TokenError::InvalidToken.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_validation_details_in_response() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "value is not a valid email address");
        errors.add("password", "must be at least 6 characters");
        let err = AppError::ValidationError(errors);

        let response = ErrorResponse::from_error_with_trace_id(&err, "trace-1".into());

        assert_eq!(response.error, "ValidationError");
        assert_eq!(response.trace_id, "trace-1");
        let details = response.details.unwrap();
        assert_eq!(details[0]["field"], "email");
        assert_eq!(details[1]["field"], "password");
    }

    #[test]
    fn test_server_errors_hide_internals() {
        let err = AppError::Internal("bcrypt cost out of range".into());
        let response = ErrorResponse::from_error_with_trace_id(&err, "t".into());

        assert_eq!(response.message, "Internal server error");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_empty_validation_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::body("x").into_result().is_err());
    }
}
