//! Search error types.

use thiserror::Error;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A stored document is missing a required field
    #[error("Stored document is missing field: {0}")]
    MissingField(&'static str),

    /// The background build task failed to complete
    #[error("Index build failed: {0}")]
    Build(String),
}
