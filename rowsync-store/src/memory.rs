//! In-memory collaborator implementations
//!
//! A complete, dependency-free backend: [`MemoryGraphStore`],
//! [`MemoryLedger`] and [`FixtureSource`] implement the full storage
//! boundary with plain maps. The scenario tests run entirely against
//! these; embedded deployments can use them as a scratch target.

use crate::error::{StoreError, StoreResult};
use crate::graph::{GraphStore, Node, NodeProps, ParentRef, RelationshipProps};
use crate::ledger::{ChangeLedger, DocumentState, LedgerEntry};
use crate::source::{ColumnInfo, ColumnType, RowSource};
use rowsync_core::{
    CodeNamespaceId, Checksum, ContainerId, Extent, NodeId, Row, StableCode, Value,
};
use rustc_hash::{FxHashMap, FxHashSet};

// ---------------------------------------------------------------------------
// MemoryGraphStore
// ---------------------------------------------------------------------------

/// Graph store backed by in-process maps
///
/// Ids are allocated sequentially starting at 1; id 0 is reserved for the
/// root scope. Code uniqueness within a scope is enforced on insert.
#[derive(Debug)]
pub struct MemoryGraphStore {
    next_id: u64,
    next_namespace: u32,
    nodes: FxHashMap<NodeId, NodeProps>,
    codes: FxHashMap<StableCode, NodeId>,
    insertion_order: Vec<NodeId>,
    relationships: Vec<RelationshipProps>,
    namespaces: FxHashMap<String, CodeNamespaceId>,
    extent: Extent,
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraphStore {
    /// Create an empty store
    ///
    /// Allocation starts at 1 on both counters; id 0 stays reserved for
    /// the root scope.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_namespace: 1,
            nodes: FxHashMap::default(),
            codes: FxHashMap::default(),
            insertion_order: Vec::new(),
            relationships: Vec::new(),
            namespaces: FxHashMap::default(),
            extent: Extent::null(),
        }
    }

    /// Total number of stored nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of stored relationship instances
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// All stored relationship instances, in insertion order
    pub fn relationships(&self) -> &[RelationshipProps] {
        &self.relationships
    }
}

impl GraphStore for MemoryGraphStore {
    fn ensure_code_namespace(&mut self, name: &str) -> StoreResult<CodeNamespaceId> {
        if let Some(id) = self.namespaces.get(name) {
            return Ok(*id);
        }
        let id = CodeNamespaceId(self.next_namespace);
        self.next_namespace += 1;
        self.namespaces.insert(name.to_string(), id);
        tracing::debug!(namespace = name, %id, "registered code namespace");
        Ok(id)
    }

    fn query_node_id_by_code(&self, code: &StableCode) -> StoreResult<Option<NodeId>> {
        Ok(self.codes.get(code).copied())
    }

    fn insert_node(&mut self, props: NodeProps) -> StoreResult<NodeId> {
        if self.codes.contains_key(&props.code) {
            return Err(StoreError::DuplicateCode {
                code: props.code.value.clone(),
                scope: props.code.scope.as_u64(),
            });
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.codes.insert(props.code.clone(), id);
        self.nodes.insert(id, props);
        self.insertion_order.push(id);
        Ok(id)
    }

    fn update_node(&mut self, id: NodeId, props: NodeProps) -> StoreResult<()> {
        let existing = self
            .nodes
            .get(&id)
            .ok_or(StoreError::NodeNotFound(id.as_u64()))?;
        if existing.code != props.code {
            self.codes.remove(&existing.code);
            self.codes.insert(props.code.clone(), id);
        }
        self.nodes.insert(id, props);
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> StoreResult<Node> {
        self.nodes
            .get(&id)
            .cloned()
            .map(|props| Node { id, props })
            .ok_or(StoreError::NodeNotFound(id.as_u64()))
    }

    fn delete_node(&mut self, id: NodeId) -> StoreResult<()> {
        let props = self
            .nodes
            .remove(&id)
            .ok_or(StoreError::NodeNotFound(id.as_u64()))?;
        self.codes.remove(&props.code);
        self.insertion_order.retain(|n| *n != id);
        self.relationships
            .retain(|r| r.source != id && r.target != id);
        Ok(())
    }

    fn set_parent(&mut self, child: NodeId, parent: ParentRef) -> StoreResult<bool> {
        let props = self
            .nodes
            .get_mut(&child)
            .ok_or(StoreError::NodeNotFound(child.as_u64()))?;
        if props.parent.as_ref() == Some(&parent) {
            return Ok(false);
        }
        props.parent = Some(parent);
        Ok(true)
    }

    fn nodes_of_type(&self, node_type: &str, limit: usize) -> StoreResult<Vec<NodeId>> {
        Ok(self
            .insertion_order
            .iter()
            .filter(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|props| props.node_type == node_type)
            })
            .take(limit)
            .copied()
            .collect())
    }

    fn query_relationship(
        &self,
        relationship_type: &str,
        source: NodeId,
        target: NodeId,
    ) -> StoreResult<bool> {
        Ok(self.relationships.iter().any(|r| {
            r.relationship_type == relationship_type && r.source == source && r.target == target
        }))
    }

    fn insert_relationship(&mut self, props: RelationshipProps) -> StoreResult<()> {
        if !self.nodes.contains_key(&props.source) {
            return Err(StoreError::NodeNotFound(props.source.as_u64()));
        }
        if !self.nodes.contains_key(&props.target) {
            return Err(StoreError::NodeNotFound(props.target.as_u64()));
        }
        self.relationships.push(props);
        Ok(())
    }

    fn project_extent(&self) -> StoreResult<Extent> {
        Ok(self.extent)
    }

    fn update_project_extent(&mut self, extent: Extent) -> StoreResult<()> {
        self.extent = extent;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// Change ledger backed by in-process maps
#[derive(Debug, Default)]
pub struct MemoryLedger {
    items: FxHashMap<(ContainerId, String), LedgerEntry>,
    seen: FxHashSet<(ContainerId, String)>,
    documents: FxHashMap<String, String>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded source items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl ChangeLedger for MemoryLedger {
    fn begin_run(&mut self) -> StoreResult<()> {
        self.seen.clear();
        Ok(())
    }

    fn get(&self, container: ContainerId, item_id: &str) -> StoreResult<Option<LedgerEntry>> {
        Ok(self
            .items
            .get(&(container, item_id.to_string()))
            .cloned())
    }

    fn record(
        &mut self,
        container: ContainerId,
        item_id: &str,
        checksum: &Checksum,
        node_id: NodeId,
    ) -> StoreResult<()> {
        let key = (container, item_id.to_string());
        self.items.insert(
            key.clone(),
            LedgerEntry {
                checksum: checksum.as_str().to_string(),
                node_id,
            },
        );
        self.seen.insert(key);
        Ok(())
    }

    fn mark_seen(&mut self, container: ContainerId, item_id: &str) -> StoreResult<()> {
        self.seen.insert((container, item_id.to_string()));
        Ok(())
    }

    fn sweep_unseen(&mut self, container: ContainerId) -> StoreResult<Vec<NodeId>> {
        let unseen: Vec<(ContainerId, String)> = self
            .items
            .keys()
            .filter(|key| key.0 == container && !self.seen.contains(*key))
            .cloned()
            .collect();
        let mut deleted = Vec::with_capacity(unseen.len());
        for key in unseen {
            if let Some(entry) = self.items.remove(&key) {
                deleted.push(entry.node_id);
            }
        }
        // Deterministic sweep order for diagnostics and tests
        deleted.sort_unstable();
        if !deleted.is_empty() {
            tracing::debug!(%container, unseen = deleted.len(), "swept unseen ledger records");
        }
        Ok(deleted)
    }

    fn document_state(&self, doc_id: &str, version: &str) -> StoreResult<DocumentState> {
        let state = match self.documents.get(doc_id) {
            None => DocumentState::New,
            Some(recorded) if recorded == version => DocumentState::Unchanged,
            Some(_) => DocumentState::Changed,
        };
        Ok(state)
    }

    fn record_document(&mut self, doc_id: &str, version: &str) -> StoreResult<()> {
        self.documents
            .insert(doc_id.to_string(), version.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FixtureSource
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct TableFixture {
    primary_key: String,
    rows: Vec<Row>,
}

/// Row source backed by in-memory tables
///
/// Column metadata is derived from the union of the table's row fields;
/// a column is `Number` when every non-null occurrence is numeric.
#[derive(Clone, Debug, Default)]
pub struct FixtureSource {
    tables: FxHashMap<String, TableFixture>,
}

impl FixtureSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a table with its primary-key column and rows
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        primary_key: impl Into<String>,
        rows: Vec<Row>,
    ) -> Self {
        self.tables.insert(
            name.into(),
            TableFixture {
                primary_key: primary_key.into(),
                rows,
            },
        );
        self
    }

    /// Replace a table's rows in place, keeping its primary key
    pub fn set_rows(&mut self, name: &str, rows: Vec<Row>) {
        if let Some(fixture) = self.tables.get_mut(name) {
            fixture.rows = rows;
        }
    }
}

impl RowSource for FixtureSource {
    fn fetch_table_data(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.tables
            .get(table)
            .map(|f| f.rows.clone())
            .ok_or_else(|| StoreError::unknown_table(table))
    }

    fn primary_key(&self, table: &str) -> StoreResult<String> {
        self.tables
            .get(table)
            .map(|f| f.primary_key.clone())
            .ok_or_else(|| StoreError::unknown_table(table))
    }

    fn fetch_columns(&self, table: &str) -> StoreResult<Vec<ColumnInfo>> {
        let fixture = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::unknown_table(table))?;
        let mut columns: Vec<ColumnInfo> = Vec::new();
        for row in &fixture.rows {
            for (qualified, value) in row.iter() {
                let name = match Row::split_qualified(qualified) {
                    Ok((_, column)) => column,
                    Err(_) => continue,
                };
                match columns.iter_mut().find(|c| c.name == name) {
                    Some(existing) => {
                        if matches!(value, Value::String(_)) {
                            existing.column_type = ColumnType::Text;
                        }
                    }
                    None => {
                        let column_type = match value {
                            Value::Number(_) => ColumnType::Number,
                            _ => ColumnType::Text,
                        };
                        columns.push(ColumnInfo::new(name, column_type));
                    }
                }
            }
        }
        Ok(columns)
    }
}
