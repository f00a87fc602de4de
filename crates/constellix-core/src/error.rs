//! Error types for the Constellix resource adapters
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the Constellix resource adapters
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failures (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Remote resource not found (HTTP 404)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Any other non-success API status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The API answered, but the body does not have the expected structure
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Invalid configuration values supplied for a resource
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Import key does not have the segment layout the resource kind expects
    #[error("Invalid import key '{key}': {reason}")]
    InvalidImportKey {
        /// The key as supplied
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// Local I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an "unexpected response shape" error
    pub fn unexpected_shape(msg: impl Into<String>) -> Self {
        Self::UnexpectedShape(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid import key error
    pub fn invalid_import_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidImportKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Whether this error is the API's "resource does not exist" answer
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// HTTP status carried by the error, if it came from an API response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::RateLimited(_) => Some(429),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_identified() {
        assert!(Error::not_found("v1/pools/A/7").is_not_found());
        assert!(!Error::api(500, "boom").is_not_found());
        assert!(!Error::auth("bad key").is_not_found());
    }

    #[test]
    fn status_is_exposed_for_api_errors() {
        assert_eq!(Error::not_found("x").status(), Some(404));
        assert_eq!(Error::api(502, "bad gateway").status(), Some(502));
        assert_eq!(Error::rate_limited("slow down").status(), Some(429));
        assert_eq!(Error::http("connection refused").status(), None);
    }

    #[test]
    fn import_key_error_names_the_key() {
        let err = Error::invalid_import_key("domains:555", "expected 3 segments, got 2");
        assert_eq!(
            err.to_string(),
            "Invalid import key 'domains:555': expected 3 segments, got 2"
        );
    }
}
