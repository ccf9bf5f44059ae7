//! Storage boundary for rowsync
//!
//! The alignment engine consumes four collaborators, each behind a trait:
//!
//! - [`RowSource`] — tabular data access: ordered rows, primary keys,
//!   column metadata
//! - [`GraphStore`] — the target graph's read/write primitives: nodes,
//!   relationships, parent references, project extent, code namespaces
//! - [`ChangeLedger`] — the persisted source-item ledger driving change
//!   classification and the deletion sweep
//! - [`SchemaProvider`] — the dynamic-schema subsystem's "what exists this
//!   run" signal: declared extra properties and the property rename map
//!
//! All traits are synchronous: the driver is a single logical thread of
//! control and store writes are assumed synchronous, with no in-process
//! retries.
//!
//! Complete in-memory implementations ([`MemoryGraphStore`],
//! [`MemoryLedger`], [`FixtureSource`], [`StaticSchemaProvider`]) back the
//! scenario tests and embedded deployments.

pub mod error;
pub mod graph;
pub mod ledger;
pub mod memory;
pub mod schema;
pub mod source;

pub use error::{StoreError, StoreResult};
pub use graph::{GraphStore, Node, NodeProps, ParentRef, RelationshipProps};
pub use ledger::{ChangeLedger, DocumentState, LedgerEntry};
pub use memory::{FixtureSource, MemoryGraphStore, MemoryLedger};
pub use schema::{SchemaProvider, StaticSchemaProvider};
pub use source::{ColumnInfo, ColumnType, RowSource};
