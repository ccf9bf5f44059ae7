//! Error types for the storage boundary

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage boundary error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// A node id was not found
    #[error("Node not found: {0}")]
    NodeNotFound(u64),

    /// Inserting a node whose code already exists in its scope
    #[error("Duplicate code '{code}' in scope {scope}")]
    DuplicateCode { code: String, scope: u64 },

    /// A table the row source does not know
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Backend failure (connection, I/O, constraint)
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }

    /// Create an unknown-table error
    pub fn unknown_table(name: impl Into<String>) -> Self {
        StoreError::UnknownTable(name.into())
    }
}
