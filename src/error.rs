//! Bragi error types

use std::time::Duration;

/// Bragi error types
#[derive(Debug, thiserror::Error)]
pub enum BragiError {
    // Configuration errors
    #[error("hosted gateway selected but no credential is configured")]
    NoCredentials,

    // Provider/network errors
    #[error("endpoint unreachable: {endpoint}: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    #[error("no model loaded at {endpoint}")]
    NoModelLoaded { endpoint: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("{operation} timed out after {limit:?}")]
    GenerationTimeout {
        operation: &'static str,
        limit: Duration,
    },

    #[error("backend returned no usable text")]
    EmptyResult,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BragiError {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Used by the hosted adapter's single 429 retry; everything else is
    /// surfaced to the caller unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            BragiError::RateLimited { .. } => true,
            BragiError::Http(_) => true,
            BragiError::EmptyResult => true,
            BragiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Provider-supplied retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BragiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Bragi operations
pub type Result<T> = std::result::Result<T, BragiError>;
