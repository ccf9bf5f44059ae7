//! Row source contract
//!
//! Tabular data access as the alignment engine sees it: a table name yields
//! an ordered sequence of rows, a primary-key column name, and column
//! metadata. The source may read ahead or fetch columns in parallel
//! internally, but presents rows as an ordered synchronous sequence; the
//! driver treats row order as a hint, not a contract, since classification
//! is keyed by stable code.

use crate::error::StoreResult;
use rowsync_core::Row;
use serde::{Deserialize, Serialize};

/// Primitive column type as reported by the source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Textual column
    Text,
    /// Numeric column
    Number,
}

/// Column metadata for one source table column
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Unqualified column name
    pub name: String,
    /// Primitive column type
    pub column_type: ColumnType,
}

impl ColumnInfo {
    /// Create column metadata
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Tabular data access
///
/// Restartable: safe to call once per table per run. Not required to
/// support concurrent calls.
pub trait RowSource {
    /// Fetch all rows of a table, each keyed by qualified column name
    fn fetch_table_data(&self, table: &str) -> StoreResult<Vec<Row>>;

    /// The primary-key column name of a table
    fn primary_key(&self, table: &str) -> StoreResult<String>;

    /// Column metadata for a table
    fn fetch_columns(&self, table: &str) -> StoreResult<Vec<ColumnInfo>>;
}
