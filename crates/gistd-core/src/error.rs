//! Error types for gistd.
//!
//! Classifies upstream Gist API failures so the HTTP layer can map each one
//! to a distinct status code and the search pipeline can log enrichment
//! failures with enough context to diagnose them.

use std::error::Error as StdError;
use thiserror::Error;

/// Main error type for gistd operations.
#[derive(Debug, Error)]
pub enum GistError {
    // Input errors
    #[error("Search query must not be empty")]
    EmptyQuery,

    // Credential errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    // Upstream rate limiting
    #[error("Rate limited by GitHub, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    // Missing resources
    #[error("Gist not found: {id}")]
    NotFound { id: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    // Generic upstream failures
    #[error("GitHub API error: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
    },
}

/// Result type alias for gistd operations.
pub type Result<T> = std::result::Result<T, GistError>;

// Conversion implementations for common error types

impl From<reqwest::Error> for GistError {
    fn from(err: reqwest::Error) -> Self {
        GistError::Network {
            message: err.to_string(),
            cause: err.source().map(|s| s.to_string()),
        }
    }
}

impl From<serde_json::Error> for GistError {
    fn from(err: serde_json::Error) -> Self {
        GistError::Json {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GistError::NotFound { id: "abc123".into() };
        assert_eq!(err.to_string(), "Gist not found: abc123");

        let err = GistError::EmptyQuery;
        assert_eq!(err.to_string(), "Search query must not be empty");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GistError = parse_err.into();
        assert!(matches!(err, GistError::Json { .. }));
    }
}
