// Authentication error types
// The session core itself never errors outward; these cover the only
// fallible surface, the login/register/profile call sites.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, warn};

use crate::backend::BackendError;

#[derive(Debug)]
pub enum AuthError {
    /// Request validation failed before reaching the backend
    ValidationError(validator::ValidationErrors),
    /// The backend refused the credentials; its message is surfaced to the
    /// caller verbatim
    CredentialsRejected(String),
    /// Operation requires a session cookie that is not present
    MissingToken,
    /// The backend could not be reached
    UpstreamUnavailable(String),
    /// The backend answered outside its envelope contract
    UpstreamInvalid(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            AuthError::CredentialsRejected(msg) => write!(f, "{}", msg),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::UpstreamUnavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            AuthError::UpstreamInvalid(msg) => write!(f, "Backend contract violation: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Error response body shared by every auth endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level validation details, omitted when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::CredentialsRejected(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AuthError::UpstreamInvalid(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let timestamp = Utc::now().to_rfc3339();
        match self {
            AuthError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(
                            serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                        ),
                        timestamp,
                    },
                )
            }
            AuthError::CredentialsRejected(message) => {
                warn!("Credentials rejected: {}", message);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error_code: "INVALID_CREDENTIALS".to_string(),
                        message: message.clone(),
                        details: None,
                        timestamp,
                    },
                )
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error_code: "MISSING_TOKEN".to_string(),
                        message: "Missing authentication token".to_string(),
                        details: None,
                        timestamp,
                    },
                )
            }
            AuthError::UpstreamUnavailable(message) => {
                // Full detail stays in the log; the client gets a generic body.
                error!("Backend unavailable: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error_code: "UPSTREAM_UNAVAILABLE".to_string(),
                        message: "The service is temporarily unavailable".to_string(),
                        details: None,
                        timestamp,
                    },
                )
            }
            AuthError::UpstreamInvalid(message) => {
                error!("Backend contract violation: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error_code: "UPSTREAM_INVALID".to_string(),
                        message: "The service returned an unexpected response".to_string(),
                        details: None,
                        timestamp,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors)
    }
}

impl From<BackendError> for AuthError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Rejected(message) => AuthError::CredentialsRejected(message),
            BackendError::Transport(e) => AuthError::UpstreamUnavailable(e.to_string()),
            BackendError::MissingData => {
                AuthError::UpstreamInvalid("response envelope missing data".to_string())
            }
        }
    }
}
