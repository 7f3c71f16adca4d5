//! Error types for the News Rack directory.

use thiserror::Error;

/// Unified error type for directory operations.
#[derive(Debug, Error)]
pub enum RackError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two nodes in the directory share an id
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
