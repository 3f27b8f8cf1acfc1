//! Error types for the helpnav workspace.

use thiserror::Error;

/// Unified error type for loading settings and site data.
#[derive(Debug, Error)]
pub enum HelpError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
