//! Change-state ledger contract
//!
//! The ledger persists, across runs, the last-seen checksum of every
//! synchronized source row (a *source item*) keyed by `(container,
//! item id)`. Classification reads it; the materializer advances it only
//! after a confirmed write, so a failed write leaves the row classified
//! New/Changed on the next run instead of silently Unchanged.
//!
//! The "seen" marks are run-scoped: cleared by [`ChangeLedger::begin_run`],
//! set as rows are observed, and consumed by the end-of-run deletion sweep,
//! which removes every unseen record and reports the node ids to delete.

use crate::error::StoreResult;
use rowsync_core::{Checksum, ContainerId, NodeId};

/// Persisted state of one source item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Content checksum recorded at last successful write
    pub checksum: String,
    /// The node the item materialized into
    pub node_id: NodeId,
}

/// Outcome of recording the source document itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentState {
    /// First time this document is seen
    New,
    /// Version differs from the recorded one
    Changed,
    /// Version matches; the whole run can be skipped
    Unchanged,
}

/// Source-item ledger
pub trait ChangeLedger {
    /// Clear run-scoped seen marks; called at run start
    fn begin_run(&mut self) -> StoreResult<()>;

    /// Look up the recorded state of a source item
    fn get(&self, container: ContainerId, item_id: &str) -> StoreResult<Option<LedgerEntry>>;

    /// Record or advance a source item after a confirmed write
    ///
    /// Also marks the item seen for the current run.
    fn record(
        &mut self,
        container: ContainerId,
        item_id: &str,
        checksum: &Checksum,
        node_id: NodeId,
    ) -> StoreResult<()>;

    /// Mark an item seen without touching its recorded state
    ///
    /// Required for Unchanged rows so the sweep does not delete them.
    fn mark_seen(&mut self, container: ContainerId, item_id: &str) -> StoreResult<()>;

    /// Remove every record under a container not seen this run
    ///
    /// Returns the node ids whose backing rows disappeared; the caller
    /// deletes those nodes from the graph.
    fn sweep_unseen(&mut self, container: ContainerId) -> StoreResult<Vec<NodeId>>;

    /// Compare the source document's version stamp against the recorded one
    ///
    /// Read-only: an [`DocumentState::Unchanged`] result lets the driver
    /// skip the whole run without touching the record.
    fn document_state(&self, doc_id: &str, version: &str) -> StoreResult<DocumentState>;

    /// Record the source document's version stamp
    ///
    /// Called only after a run completed without failed passes, so a
    /// failed run re-presents the same document next time.
    fn record_document(&mut self, doc_id: &str, version: &str) -> StoreResult<()>;
}
