//! Error types for authentication operations.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the username/password pair.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The server rejected the signup.
    #[error("Signup rejected: {0}")]
    SignupRejected(String),

    /// Underlying backend request failed.
    #[error("Backend request failed: {0}")]
    Api(#[from] ApiError),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_display() {
        let error = AuthError::InvalidCredentials;
        assert_eq!(error.to_string(), "Invalid username or password");
    }

    #[test]
    fn signup_rejected_display() {
        let error = AuthError::SignupRejected("Username taken".to_string());
        assert_eq!(error.to_string(), "Signup rejected: Username taken");
    }

    #[test]
    fn api_error_wraps_with_context() {
        let error = AuthError::from(ApiError::Transport {
            endpoint: "login".to_string(),
            reason: "timed out".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Backend request failed: Request to login failed: timed out"
        );
    }
}
