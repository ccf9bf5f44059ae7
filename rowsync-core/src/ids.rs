//! Typed ID newtypes for graph entities.
//!
//! Each type is `#[repr(transparent)]` + `Copy`, so wrapping a raw primitive
//! costs nothing at runtime — the compiler enforces type boundaries at zero
//! cost. IDs are allocated by the graph store; the alignment engine only
//! carries them between lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Graph node ID (u64), allocated by the graph store on insert.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
    #[inline]
    pub fn from_u64(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ContainerId
// ---------------------------------------------------------------------------

/// Container node ID (subject, partition, model, or category).
///
/// Containers are graph nodes too; a separate newtype keeps code scopes
/// from being confused with ordinary node references.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct ContainerId(pub u64);

impl ContainerId {
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
    #[inline]
    pub fn from_u64(v: u64) -> Self {
        Self(v)
    }
    /// The root scope: codes for top-level subjects are scoped here.
    #[inline]
    pub fn root() -> Self {
        Self(0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

impl From<NodeId> for ContainerId {
    fn from(id: NodeId) -> Self {
        Self(id.0)
    }
}

impl From<ContainerId> for NodeId {
    fn from(id: ContainerId) -> Self {
        Self(id.0)
    }
}

// ---------------------------------------------------------------------------
// CodeNamespaceId
// ---------------------------------------------------------------------------

/// Code namespace ID (u32).
///
/// A code namespace partitions stable codes by mapping deployment, so two
/// connectors writing to the same store cannot collide. Namespaces are
/// registered by name before the first write of a run; the default id 0 is
/// the unregistered placeholder.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct CodeNamespaceId(pub u32);

impl CodeNamespaceId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
    #[inline]
    pub fn from_u32(v: u32) -> Self {
        Self(v)
    }
}

impl fmt::Display for CodeNamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CodeNamespaceId({})", self.0)
    }
}
