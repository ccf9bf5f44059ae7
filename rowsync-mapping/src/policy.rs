//! Synchronization policies
//!
//! Some deployments have one pre-existing "unmanaged" physical node that
//! serves as a universal join target: relationship rows of certain types
//! all point at it, and the engine must reuse it rather than materialize a
//! node per row. The general rule — when the exception applies versus
//! normal per-row materialization — is configuration, expressed here as a
//! predicate over (type name, existing-instance count).

use rowsync_core::Row;
use serde::{Deserialize, Serialize};

/// Policy for a type whose canonical representation is a pre-existing node
///
/// During the type's element-class pass the engine probes the store for up
/// to `expected_instances` existing nodes of `node_type`:
///
/// - exactly `expected_instances` found → the type is treated as already
///   synchronized; the probed instance id is cached and substituted as the
///   target of any relationship whose type is in `fallback_relationships`
/// - otherwise → normal row-driven materialization runs against
///   `synthetic_row` as a single-row table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnmanagedNodePolicy {
    /// The node type the policy applies to
    pub node_type: String,
    /// Instance count that marks the type as already synchronized
    pub expected_instances: usize,
    /// Single synthetic row materialized when the probe comes up short
    pub synthetic_row: Row,
    /// Relationship types whose targets fall back to the cached instance
    pub fallback_relationships: Vec<String>,
}

impl UnmanagedNodePolicy {
    /// Create a policy for a node type
    pub fn new(node_type: impl Into<String>, expected_instances: usize, synthetic_row: Row) -> Self {
        Self {
            node_type: node_type.into(),
            expected_instances,
            synthetic_row,
            fallback_relationships: Vec::new(),
        }
    }

    /// Add a relationship type that redirects to the cached instance
    pub fn with_fallback_relationship(mut self, relationship_type: impl Into<String>) -> Self {
        self.fallback_relationships
            .push(relationship_type.into());
        self
    }

    /// Whether this policy governs the given node type
    pub fn applies_to(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// Whether targets of the given relationship type fall back
    pub fn redirects_relationship(&self, relationship_type: &str) -> bool {
        self.fallback_relationships
            .iter()
            .any(|r| r == relationship_type)
    }
}
