//! Change classification
//!
//! Given a source item's id and its current content checksum, decide what
//! the alignment run must do with it by consulting the ledger:
//!
//! - no prior record → [`ItemState::New`]
//! - prior record with equal checksum → [`ItemState::Unchanged`]; the
//!   caller must still mark the item seen so the deletion sweep keeps it
//! - prior record with different checksum → [`ItemState::Changed`], with
//!   the recorded node id so the materializer updates in place
//!
//! Classification and commit are two phases: the ledger is advanced by the
//! materializer only after the write succeeded, never here.

use crate::error::AlignResult;
use rowsync_core::{Checksum, ContainerId, NodeId};
use rowsync_store::ChangeLedger;

/// How a source item compares to its last recorded state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemState {
    /// No prior record; an insert is required
    New,
    /// Checksum differs; an in-place update is required
    Changed,
    /// Checksum matches; no write, but the item must be marked seen
    Unchanged,
}

/// Classification outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// The item's state against the ledger
    pub state: ItemState,
    /// Node id recorded at the last successful write, when one exists
    pub existing_node: Option<NodeId>,
}

/// Classify a source item against the ledger
pub fn classify<L: ChangeLedger>(
    ledger: &L,
    container: ContainerId,
    item_id: &str,
    checksum: &Checksum,
) -> AlignResult<Classification> {
    let classification = match ledger.get(container, item_id)? {
        None => Classification {
            state: ItemState::New,
            existing_node: None,
        },
        Some(entry) if entry.checksum == checksum.as_str() => Classification {
            state: ItemState::Unchanged,
            existing_node: Some(entry.node_id),
        },
        Some(entry) => Classification {
            state: ItemState::Changed,
            existing_node: Some(entry.node_id),
        },
    };
    Ok(classification)
}
