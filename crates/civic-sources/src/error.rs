//! Error types for provider requests

use civic_domain::SourceId;
use std::time::Duration;
use thiserror::Error;

/// Errors a provider request can hit
///
/// These never leave an adapter: `with_fallback` turns them into the `note`
/// of a fallback `SourceResult`.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connection, DNS or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),

    /// Body could not be read as the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Provider did not answer within the per-call bound
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Parameters addressed to a different source
    #[error("Parameters addressed to source '{0}'")]
    Misrouted(SourceId),

    /// Invalid adapter configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Network(format!("request timed out: {}", e))
        } else if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}
