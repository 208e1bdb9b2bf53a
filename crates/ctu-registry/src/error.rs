//! Error types for the registry client.

use thiserror::Error;

/// Errors that can occur while talking to the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from the registry.
    #[error("registry returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Retry budget exhausted for one page fetch.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<RegistryError>,
    },
}

impl RegistryError {
    /// Whether a fresh attempt could plausibly succeed.
    ///
    /// Mirrors the usual HTTP retry policy: transport errors and the
    /// throttling/server statuses are retryable, other statuses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegistryError::Network(_) => true,
            RegistryError::Status { status, .. } => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            RegistryError::RetriesExhausted { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
