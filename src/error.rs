//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication was rejected or returned no user
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Password hashing failed
    #[error("Hash error: {0}")]
    Hash(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create an authentication error with message
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the backend rejected the caller's credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. } | Self::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = AppError::Api {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (409): duplicate key value");
    }

    #[test]
    fn test_validation_error_is_bare_message() {
        let err = AppError::validation("Password is required.");
        assert_eq!(err.to_string(), "Password is required.");
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(AppError::auth("no email").is_unauthorized());
        assert!(
            AppError::Api {
                status: 401,
                message: "JWT expired".to_string()
            }
            .is_unauthorized()
        );
        assert!(
            !AppError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .is_unauthorized()
        );
        assert!(!AppError::not_found("admin").is_unauthorized());
    }

    #[test]
    fn test_bad_request_is_not_unauthorized() {
        let err = AppError::Api {
            status: 400,
            message: "failed to parse filter".to_string(),
        };
        assert!(!err.is_unauthorized());
    }
}
