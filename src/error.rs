//! Error types shared across the crate.

use thiserror::Error;

/// Failure appending to or reading from a reading store.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reading serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected the append with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("store misconfigured: {0}")]
    Config(String),
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field} — {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"pricing.jitter"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
