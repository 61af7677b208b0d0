//! Error types for backend API operations.
//!
//! This module defines error types that can occur while talking to the
//! TrainFriends backend over HTTP.

use thiserror::Error;

/// Errors that can occur during backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Request to {endpoint} failed: {reason}")]
    Transport {
        /// The endpoint path that was being called.
        endpoint: String,
        /// The transport-level failure.
        reason: String,
    },

    /// The server answered with a non-success status code.
    #[error("Server returned {status} for {endpoint}: {detail}")]
    Status {
        /// The endpoint path that was being called.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
        /// The server's error detail, or the raw body when unparseable.
        detail: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {endpoint}: {reason}")]
    Decode {
        /// The endpoint path that was being called.
        endpoint: String,
        /// The decoding failure.
        reason: String,
    },
}

impl ApiError {
    /// Returns whether the server answered 401 (missing or expired session).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

/// Result type for backend API operations.
pub type ApiResult<T> = Result<T, ApiError>;
