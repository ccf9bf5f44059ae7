//! Alignment error taxonomy
//!
//! Four severities, each with its own blast radius:
//!
//! - row skips (empty key, missing property, unresolved endpoint) are not
//!   errors at all — they are logged in-line and the run continues
//! - [`AlignError::ContainerResolution`] aborts the containing model's
//!   subtree but not sibling models
//! - [`AlignError::Write`] aborts the current row; the change ledger is
//!   never advanced for a failed write, so the row reclassifies as
//!   New/Changed on the next run
//! - [`AlignError::SchemaUnavailable`] aborts the whole run before any
//!   writes, since node shapes cannot be determined

use rowsync_mapping::MappingError;
use rowsync_store::StoreError;
use thiserror::Error;

/// Result type for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;

/// Alignment engine errors
#[derive(Debug, Error)]
pub enum AlignError {
    /// Required type metadata is missing; no writes have happened
    #[error("Schema metadata unavailable for type '{0}'")]
    SchemaUnavailable(String),

    /// A container (model or category) could not be resolved or created
    #[error("Container resolution failed for '{name}': {source}")]
    ContainerResolution {
        /// Model or category name
        name: String,
        #[source]
        source: StoreError,
    },

    /// A node or relationship write failed; ledger state was not advanced
    #[error("Write failed for item '{item}' in table '{table}': {source}")]
    Write {
        table: String,
        item: String,
        #[source]
        source: StoreError,
    },

    /// The row source failed for a table
    #[error("Row source failure for table '{table}': {source}")]
    Source {
        table: String,
        #[source]
        source: StoreError,
    },

    /// Ledger or store plumbing failure outside a row write
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The mapping tree failed validation
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl AlignError {
    /// Create a container-resolution error
    pub fn container(name: impl Into<String>, source: StoreError) -> Self {
        AlignError::ContainerResolution {
            name: name.into(),
            source,
        }
    }

    /// Create a write error
    pub fn write(table: impl Into<String>, item: impl Into<String>, source: StoreError) -> Self {
        AlignError::Write {
            table: table.into(),
            item: item.into(),
            source,
        }
    }

    /// Create a row-source error
    pub fn source(table: impl Into<String>, source: StoreError) -> Self {
        AlignError::Source {
            table: table.into(),
            source,
        }
    }
}
