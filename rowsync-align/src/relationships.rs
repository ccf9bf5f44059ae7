//! Relationship resolution
//!
//! A relationship class pass runs after every element pass of its model,
//! so both endpoints already exist (or provably do not). Each row names
//! its endpoints by key value; endpoint lookup rebuilds the stable code
//! the element pass would have derived, including key-prefix dispatch, and
//! resolves it through the run cache before falling back to a store query.
//!
//! First-class relationships are deduplicated on the exact (type, source,
//! target) triple. Embedded references write the parent field on the
//! child node; the store reports whether anything actually changed, which
//! keeps re-runs write-free.

use crate::driver::Aligner;
use crate::error::{AlignError, AlignResult};
use rowsync_core::{NodeId, Row};
use rowsync_mapping::{EndpointSpec, RelationshipClassSpec, RelationshipKind};
use rowsync_store::{
    ChangeLedger, GraphStore, ParentRef, RelationshipProps, RowSource, SchemaProvider,
};

impl<G, L, S, R> Aligner<'_, G, L, S, R>
where
    G: GraphStore,
    L: ChangeLedger,
    S: SchemaProvider,
    R: RowSource,
{
    /// Run one relationship-class pass over its backing table
    pub(crate) fn resolve_relationship_class(
        &mut self,
        spec: &RelationshipClassSpec,
    ) -> AlignResult<()> {
        let rows = self
            .source
            .fetch_table_data(&spec.table)
            .map_err(|e| AlignError::source(&spec.table, e))?;
        tracing::debug!(
            relationship = %spec.name,
            table = %spec.table,
            rows = rows.len(),
            "resolving relationship class"
        );

        for row in &rows {
            match self.resolve_relationship_row(spec, row) {
                Ok(()) => {}
                Err(error @ AlignError::Write { .. }) => {
                    tracing::error!(%error, "relationship write failed, continuing");
                    self.report.skipped_rows += 1;
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    fn resolve_relationship_row(
        &mut self,
        spec: &RelationshipClassSpec,
        row: &Row,
    ) -> AlignResult<()> {
        let Some(source) = self.resolve_endpoint(&spec.source, row)? else {
            tracing::warn!(
                relationship = %spec.name,
                key_field = %spec.source.key_field,
                "source endpoint unresolved, skipping row"
            );
            self.report.skipped_rows += 1;
            return Ok(());
        };
        let Some(target) = self.resolve_target(spec, row)? else {
            tracing::warn!(
                relationship = %spec.name,
                key_field = %spec.target.key_field,
                "target endpoint unresolved, skipping row"
            );
            self.report.skipped_rows += 1;
            return Ok(());
        };

        match spec.kind {
            RelationshipKind::EmbeddedReference => {
                let reference = ParentRef::new(source, &spec.relationship_type);
                let written = self
                    .graph
                    .set_parent(target, reference)
                    .map_err(|e| AlignError::write(&spec.table, &spec.name, e))?;
                if written {
                    self.report.references_set += 1;
                }
            }
            RelationshipKind::Relationship => {
                let exists =
                    self.graph
                        .query_relationship(&spec.relationship_type, source, target)?;
                if !exists {
                    let props =
                        RelationshipProps::new(&spec.relationship_type, source, target);
                    self.graph
                        .insert_relationship(props)
                        .map_err(|e| AlignError::write(&spec.table, &spec.name, e))?;
                    self.report.relationships_inserted += 1;
                }
            }
        }
        Ok(())
    }

    /// Resolve the target endpoint, honoring the unmanaged fallback
    ///
    /// When the unmanaged policy lists this relationship type and a
    /// fallback instance was cached during the element pass, the cached
    /// instance is the target regardless of the row's key fields.
    fn resolve_target(
        &mut self,
        spec: &RelationshipClassSpec,
        row: &Row,
    ) -> AlignResult<Option<NodeId>> {
        let redirected = self
            .config
            .unmanaged_policy
            .as_ref()
            .is_some_and(|p| p.redirects_relationship(&spec.relationship_type));
        if redirected {
            if let Some(fallback) = self.unmanaged_target {
                return Ok(Some(fallback));
            }
        }
        self.resolve_endpoint(&spec.target, row)
    }

    /// Resolve one endpoint row field to a node id
    ///
    /// Rebuilds the endpoint's stable code (key-prefix dispatch included)
    /// under the endpoint's declared model scope, then resolves it via the
    /// run cache or a store query. Missing keys, unresolved models and
    /// absent nodes all yield `None`; the caller decides what a miss means.
    fn resolve_endpoint(
        &mut self,
        endpoint: &EndpointSpec,
        row: &Row,
    ) -> AlignResult<Option<NodeId>> {
        let Some(key) = row.get_text(&endpoint.key_field).filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let Some(model_id) = self.model_id_by_name(&endpoint.model_name) else {
            tracing::warn!(model = %endpoint.model_name, "endpoint model not resolved this run");
            return Ok(None);
        };
        let Ok(code) = self.codec.code_for(&endpoint.node_type, model_id, &key) else {
            return Ok(None);
        };
        if let Some(id) = self.element_cache.get(&code) {
            return Ok(Some(*id));
        }
        self.graph.query_node_id_by_code(&code).map_err(Into::into)
    }
}
