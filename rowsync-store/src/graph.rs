//! Graph store contract
//!
//! The target graph's read/write primitives, exactly the surface the
//! alignment engine needs: query a node by its stable code, insert or
//! update nodes, query and insert relationship instances, mutate a node's
//! parent/embedding reference, and read/grow the project extent.
//!
//! Node identity is the stable code: if a node with a given code already
//! exists its id is reused (update in place), otherwise the store allocates
//! a new id on insert. Code uniqueness within a scope is a store-enforced
//! invariant.

use crate::error::StoreResult;
use rowsync_core::{CodeNamespaceId, ContainerId, Extent, NodeId, Placement, StableCode, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parent/embedding reference stored on a child node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    /// The embedding parent
    pub parent: NodeId,
    /// The relationship type the reference realizes
    pub relationship_type: String,
}

impl ParentRef {
    /// Create a parent reference
    pub fn new(parent: NodeId, relationship_type: impl Into<String>) -> Self {
        Self {
            parent,
            relationship_type: relationship_type.into(),
        }
    }
}

/// Writable properties of a node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    /// Logical node type
    pub node_type: String,
    /// Durable identity
    pub code: StableCode,
    /// Containing model
    pub model: ContainerId,
    /// Category, when the mapping assigns one
    pub category: Option<ContainerId>,
    /// User-facing label
    pub label: Option<String>,
    /// Placement, for placement-bearing types
    pub placement: Option<Placement>,
    /// Embedding parent, when an embedded-reference relationship set one
    pub parent: Option<ParentRef>,
    /// Assigned type-definition node
    pub type_definition: Option<NodeId>,
    /// Type-specific properties copied from the source row
    pub properties: BTreeMap<String, Value>,
}

impl NodeProps {
    /// Create minimal props for a typed node
    pub fn new(node_type: impl Into<String>, code: StableCode, model: ContainerId) -> Self {
        Self {
            node_type: node_type.into(),
            code,
            model,
            category: None,
            label: None,
            placement: None,
            parent: None,
            type_definition: None,
            properties: BTreeMap::new(),
        }
    }

    /// Set the user-facing label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: ContainerId) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the placement
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Set a copied property
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// A stored node: id plus properties
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Store-allocated id
    pub id: NodeId,
    /// Current properties
    pub props: NodeProps,
}

/// Writable properties of a first-class relationship instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipProps {
    /// Relationship type
    pub relationship_type: String,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
}

impl RelationshipProps {
    /// Create relationship props
    pub fn new(relationship_type: impl Into<String>, source: NodeId, target: NodeId) -> Self {
        Self {
            relationship_type: relationship_type.into(),
            source,
            target,
        }
    }
}

/// Target graph read/write primitives
pub trait GraphStore {
    /// Register (or fetch) the code namespace for a mapping deployment
    ///
    /// Called before the first write of a run.
    fn ensure_code_namespace(&mut self, name: &str) -> StoreResult<CodeNamespaceId>;

    /// Resolve a stable code to a node id, if the node exists
    fn query_node_id_by_code(&self, code: &StableCode) -> StoreResult<Option<NodeId>>;

    /// Insert a new node, allocating its id
    ///
    /// Fails with `DuplicateCode` when the code already exists in its scope.
    fn insert_node(&mut self, props: NodeProps) -> StoreResult<NodeId>;

    /// Replace an existing node's properties in place
    fn update_node(&mut self, id: NodeId, props: NodeProps) -> StoreResult<()>;

    /// Fetch a node by id
    fn get_node(&self, id: NodeId) -> StoreResult<Node>;

    /// Delete a node and any relationship instances referencing it
    fn delete_node(&mut self, id: NodeId) -> StoreResult<()>;

    /// Set a node's parent/embedding reference
    ///
    /// Single-parent invariant: at most one embedding parent at a time.
    /// Returns `false` when the node already carried an equal reference
    /// (idempotent re-run), `true` when the reference was written.
    fn set_parent(&mut self, child: NodeId, parent: ParentRef) -> StoreResult<bool>;

    /// Ids of up to `limit` existing nodes of a type, in insertion order
    ///
    /// Backs the unmanaged-node probe; `limit` bounds the scan.
    fn nodes_of_type(&self, node_type: &str, limit: usize) -> StoreResult<Vec<NodeId>>;

    /// Whether a relationship instance with this exact (type, source,
    /// target) triple exists
    fn query_relationship(
        &self,
        relationship_type: &str,
        source: NodeId,
        target: NodeId,
    ) -> StoreResult<bool>;

    /// Insert a relationship instance
    fn insert_relationship(&mut self, props: RelationshipProps) -> StoreResult<()>;

    /// The stored project extent
    fn project_extent(&self) -> StoreResult<Extent>;

    /// Replace the stored project extent
    ///
    /// Callers only pass extents that grow the stored one (monotonic).
    fn update_project_extent(&mut self, extent: Extent) -> StoreResult<()>;
}
