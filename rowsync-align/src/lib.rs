//! The rowsync alignment engine
//!
//! [`Aligner::run`] performs one incremental synchronization of a target
//! graph against a relational source, driven by a declarative
//! [`MappingTree`](rowsync_mapping::MappingTree):
//!
//! 1. validate the tree and preflight the schema (fatal before any write)
//! 2. gate on the source document's version stamp, when configured
//! 3. walk subjects → partitions → models in pre-order, resolving
//!    containers and materializing element classes row by row
//! 4. resolve relationship classes after a model's element passes
//! 5. sweep: delete every previously synchronized item whose backing row
//!    disappeared
//!
//! Change detection is checksum-based and two-phase: rows are classified
//! New/Changed/Unchanged against the change ledger, and the ledger only
//! advances after the store confirmed the corresponding write. Runs are
//! idempotent; aligning twice from the same source is a no-op the second
//! time.

pub mod classify;
mod containers;
pub mod driver;
pub mod error;
mod materialize;
mod relationships;

pub use classify::{classify, Classification, ItemState};
pub use driver::{AlignConfig, Aligner, RunReport, SourceDocument};
pub use error::{AlignError, AlignResult};
