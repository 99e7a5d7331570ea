//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using the application error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
///
/// The authentication-flow variants (`ConfigurationMissing`,
/// `AuthenticationFailed`, `Transport`) never surface as HTTP errors on the
/// login routes: the callback handler resolves them to a failure redirect.
/// The `IntoResponse` impl below is the fallback for every other route.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// A provider's flow was exercised without credentials
    #[error("Provider not configured: {0}")]
    ConfigurationMissing(String),

    /// The provider rejected the flow or the user denied consent
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A guarded route was hit without an authenticated session
    #[error("Authentication required")]
    UnauthenticatedAccess,

    /// Network failure while talking to a provider
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// Session error
    #[error("Session error: {0}")]
    Session(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error belongs to the authentication flow and should
    /// resolve to a failure redirect rather than an error response.
    pub fn is_flow_failure(&self) -> bool {
        matches!(
            self,
            Error::ConfigurationMissing(_)
                | Error::AuthenticationFailed(_)
                | Error::Transport(_)
        )
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Config(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_code(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    e.to_string(),
                ),
            ),

            Error::ConfigurationMissing(provider) => {
                tracing::warn!(provider = %provider, "provider flow exercised without credentials");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::with_code(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PROVIDER_NOT_CONFIGURED",
                        format!("Provider not configured: {}", provider),
                    ),
                )
            }

            Error::AuthenticationFailed(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_code(StatusCode::UNAUTHORIZED, "AUTH_FAILED", msg),
            ),

            Error::UnauthenticatedAccess => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_code(
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required",
                ),
            ),

            Error::Transport(msg) => {
                tracing::error!("Provider transport error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::with_code(
                        StatusCode::BAD_GATEWAY,
                        "EXTERNAL_ERROR",
                        "Identity provider unavailable",
                    ),
                )
            }

            Error::Session(msg) => {
                tracing::error!("Session error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "SESSION_ERROR",
                        "Session operation failed",
                    ),
                )
            }

            Error::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ),

            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ),

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "I/O operation failed",
                    ),
                )
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Boxed to keep the enum small
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new(StatusCode::NOT_FOUND, "Profile not found");
        assert_eq!(err.status, 404);
        assert_eq!(err.error, "Profile not found");
        assert!(err.code.is_none());
    }

    #[test]
    fn test_error_response_with_code() {
        let err = ErrorResponse::with_code(
            StatusCode::UNAUTHORIZED,
            "AUTH_FAILED",
            "Provider rejected the code",
        );
        assert_eq!(err.status, 401);
        assert_eq!(err.code, Some("AUTH_FAILED".to_string()));
    }

    #[test]
    fn test_flow_failure_classification() {
        assert!(Error::ConfigurationMissing("facebook".into()).is_flow_failure());
        assert!(Error::AuthenticationFailed("denied".into()).is_flow_failure());
        assert!(Error::Transport("timeout".into()).is_flow_failure());

        assert!(!Error::UnauthenticatedAccess.is_flow_failure());
        assert!(!Error::NotFound("nope".into()).is_flow_failure());
        assert!(!Error::Session("broken".into()).is_flow_failure());
    }
}
