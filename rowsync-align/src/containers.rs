//! Container resolution
//!
//! Subjects, models and categories are ordinary graph nodes with stable
//! codes; resolving one is "query by code, create when absent". Results
//! are memoized for the run so the hot path (one lookup per row) is a map
//! probe, not a store query.
//!
//! Scoping chain: subject codes live under the root scope, model codes
//! under their subject, category codes under their model. Node codes then
//! scope under their model, which is what isolates identical key values in
//! different models from each other.

use crate::driver::Aligner;
use rowsync_core::{ContainerId, StableCode};
use rowsync_mapping::{CategoryKind, ElementSpec, ModelSpec, PartitionSpec, SubjectSpec};
use rowsync_store::{ChangeLedger, GraphStore, NodeProps, RowSource, SchemaProvider, StoreError, StoreResult};

/// Node type a model container takes from its partition's kind
pub(crate) fn model_type_name(partition: &PartitionSpec) -> &'static str {
    use rowsync_mapping::PartitionKind::*;
    match partition.kind {
        Definition => "DefinitionModel",
        Physical => "PhysicalModel",
        SpatialLocation => "SpatialLocationModel",
        InformationRecord => "InformationRecordModel",
        GroupInformation => "GroupInformationModel",
        Document => "DocumentListModel",
        Functional => "FunctionalModel",
    }
}

/// Node type of a singleton category element
pub(crate) fn category_type_name(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Spatial => "SpatialCategory",
        CategoryKind::Drawing => "DrawingCategory",
    }
}

impl<G, L, S, R> Aligner<'_, G, L, S, R>
where
    G: GraphStore,
    L: ChangeLedger,
    S: SchemaProvider,
    R: RowSource,
{
    /// Derive a container code, surfacing codec failures as store errors
    ///
    /// Container names come from the mapping tree, so an empty name is a
    /// configuration mistake rather than dirty source data.
    fn container_code(
        &self,
        type_name: &str,
        scope: ContainerId,
        name: &str,
    ) -> StoreResult<StableCode> {
        self.codec
            .code_for(type_name, scope, name)
            .map_err(|e| StoreError::backend(e.to_string()))
    }

    /// Query a container by code, creating it when absent
    fn resolve_container(
        &mut self,
        type_name: &str,
        scope: ContainerId,
        name: &str,
    ) -> StoreResult<ContainerId> {
        let code = self.container_code(type_name, scope, name)?;
        if let Some(existing) = self.graph.query_node_id_by_code(&code)? {
            return Ok(ContainerId::from(existing));
        }
        let props = NodeProps::new(type_name, code, scope).with_label(name);
        let id = self.graph.insert_node(props)?;
        tracing::debug!(container = name, node_type = type_name, %id, "created container");
        Ok(ContainerId::from(id))
    }

    /// Resolve a subject under the root scope
    pub(crate) fn resolve_subject(&mut self, subject: &SubjectSpec) -> StoreResult<ContainerId> {
        self.resolve_container("Subject", ContainerId::root(), &subject.name)
    }

    /// Resolve a model under its subject, typed by its partition's kind
    pub(crate) fn resolve_model(
        &mut self,
        subject_id: ContainerId,
        partition: &PartitionSpec,
        model: &ModelSpec,
    ) -> StoreResult<ContainerId> {
        if let Some(id) = self.model_cache.get(&model.name) {
            return Ok(*id);
        }
        let id = self.resolve_container(model_type_name(partition), subject_id, &model.name)?;
        self.model_cache.insert(model.name.clone(), id);
        Ok(id)
    }

    /// A model's container id, when its model has been resolved this run
    ///
    /// Models are resolved in tree order, so a lookup can only miss when a
    /// mapping references a model the traversal has not reached yet.
    pub(crate) fn model_id_by_name(&self, name: &str) -> Option<ContainerId> {
        self.model_cache.get(name).copied()
    }

    /// Materialize a singleton element under a model
    pub(crate) fn materialize_element(
        &mut self,
        model_id: ContainerId,
        element: &ElementSpec,
    ) -> StoreResult<()> {
        match element {
            ElementSpec::Category { name, kind } => {
                if self.category_cache.contains_key(name) {
                    return Ok(());
                }
                let id = self.resolve_container(category_type_name(*kind), model_id, name)?;
                self.category_cache.insert(name.clone(), id);
                Ok(())
            }
        }
    }
}
