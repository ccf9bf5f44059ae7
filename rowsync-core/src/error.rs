//! Error types for rowsync-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A key value required for code construction was empty
    #[error("Empty key value for type '{type_name}'")]
    EmptyKey {
        /// The logical node type whose code could not be built
        type_name: String,
    },

    /// A qualified column name was not in `Table.column` form
    #[error("Invalid qualified column name: {0}")]
    InvalidColumnName(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create an empty-key error
    pub fn empty_key(type_name: impl Into<String>) -> Self {
        CoreError::EmptyKey {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid-column-name error
    pub fn invalid_column_name(name: impl Into<String>) -> Self {
        CoreError::InvalidColumnName(name.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        CoreError::Other(msg.into())
    }
}
