//! Row materialization
//!
//! One element-class pass turns every row of a backing table into a typed
//! node: derive the row's stable code, classify it against the ledger,
//! build node properties (label, category, copied properties, placement),
//! then insert or update. The ledger advances only after the store
//! confirmed the write, so a failed write re-presents the row next run.
//!
//! Placement-bearing rows may carry joined coordinate columns; when
//! present they override the default zero origin, and the node's
//! world-space box is folded into the project extent (which only grows).

use crate::classify::{classify, ItemState};
use crate::driver::Aligner;
use crate::error::{AlignError, AlignResult};
use rowsync_core::{qualify, row_checksum, ContainerId, NodeId, Placement, Point3, Row};
use rowsync_mapping::{ElementClassSpec, NodeTypeInfo, TypeDefinitionSpec};
use rowsync_store::{ChangeLedger, GraphStore, NodeProps, RowSource, SchemaProvider};

/// Joined coordinate columns recognized on placement-bearing rows
const COORD_ID: &str = "Coordinate.id";
const COORD_X: &str = "Coordinate.coordinatexaxis";
const COORD_Y: &str = "Coordinate.coordinateyaxis";
const COORD_Z: &str = "Coordinate.coordinatezaxis";

impl<G, L, S, R> Aligner<'_, G, L, S, R>
where
    G: GraphStore,
    L: ChangeLedger,
    S: SchemaProvider,
    R: RowSource,
{
    /// Run one element-class pass over its backing table
    pub(crate) fn materialize_element_class(
        &mut self,
        model_id: ContainerId,
        class: &ElementClassSpec,
    ) -> AlignResult<()> {
        let info = self
            .registry
            .get(&class.node_type)
            .ok_or_else(|| AlignError::SchemaUnavailable(class.node_type.clone()))?
            .clone();

        let mut synthetic = false;
        let rows = match self.unmanaged_rows(&class.node_type)? {
            Some(None) => return Ok(()),
            Some(Some(row)) => {
                synthetic = true;
                vec![row]
            }
            None => self
                .source
                .fetch_table_data(&info.table)
                .map_err(|e| AlignError::source(&info.table, e))?,
        };

        let key_field = self.key_field(&info, synthetic, rows.first())?;
        tracing::debug!(
            node_type = %info.name,
            table = %info.table,
            rows = rows.len(),
            "materializing element class"
        );

        for row in &rows {
            match self.align_row(model_id, class, &info, &key_field, row) {
                Ok(()) => {}
                Err(error @ AlignError::Write { .. }) => {
                    tracing::error!(%error, "row write failed, continuing");
                    self.report.skipped_rows += 1;
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    /// Unmanaged-policy gate for an element class
    ///
    /// `None`: policy does not apply, run the normal table pass.
    /// `Some(None)`: probe matched, the type is already synchronized.
    /// `Some(Some(row))`: probe came up short, materialize this one row.
    fn unmanaged_rows(&mut self, node_type: &str) -> AlignResult<Option<Option<Row>>> {
        let Some(policy) = self
            .config
            .unmanaged_policy
            .as_ref()
            .filter(|p| p.applies_to(node_type))
            .cloned()
        else {
            return Ok(None);
        };

        // The scan is capped at the expected count, so "expected or more"
        // existing instances both read as a full probe.
        let probed = self
            .graph
            .nodes_of_type(node_type, policy.expected_instances)?;
        if probed.len() == policy.expected_instances {
            self.unmanaged_target = probed.first().copied();
            tracing::debug!(
                node_type,
                instances = probed.len(),
                "unmanaged probe matched, type already synchronized"
            );
            return Ok(Some(None));
        }
        tracing::debug!(
            node_type,
            instances = probed.len(),
            expected = policy.expected_instances,
            "unmanaged probe short, materializing synthetic row"
        );
        Ok(Some(Some(policy.synthetic_row)))
    }

    /// Qualified primary-key field of a class's backing table
    ///
    /// A synthetic single-row table may be unknown to the row source; its
    /// key column falls back to the row's first column.
    fn key_field(
        &self,
        info: &NodeTypeInfo,
        synthetic: bool,
        first_row: Option<&Row>,
    ) -> AlignResult<String> {
        match self.source.primary_key(&info.table) {
            Ok(pk) => Ok(qualify(&info.table, &pk)),
            Err(_) if synthetic => first_row
                .and_then(|row| row.iter().next())
                .map(|(name, _)| name.to_string())
                .ok_or_else(|| AlignError::SchemaUnavailable(info.name.clone())),
            Err(e) => Err(AlignError::source(&info.table, e)),
        }
    }

    /// Align one source row with its target node
    fn align_row(
        &mut self,
        model_id: ContainerId,
        class: &ElementClassSpec,
        info: &NodeTypeInfo,
        key_field: &str,
        row: &Row,
    ) -> AlignResult<()> {
        let Some(key) = row.get_text(key_field).filter(|k| !k.is_empty()) else {
            tracing::warn!(table = %info.table, key_field, "row has empty key, skipping");
            self.report.skipped_rows += 1;
            return Ok(());
        };

        let Ok(code) = self.codec.code_for(&info.name, model_id, &key) else {
            tracing::warn!(table = %info.table, key = %key, "code derivation failed, skipping row");
            self.report.skipped_rows += 1;
            return Ok(());
        };
        let item_id = code.value.clone();
        let checksum = row_checksum(row);

        let classification = classify(&*self.ledger, model_id, &item_id, &checksum)?;
        if classification.state == ItemState::Unchanged {
            self.ledger.mark_seen(model_id, &item_id)?;
            if let Some(existing) = classification.existing_node {
                self.element_cache.insert(code, existing);
            }
            self.report.unchanged += 1;
            return Ok(());
        }

        let mut props = NodeProps::new(info.name.clone(), code.clone(), model_id);
        if let Some(label) = row.get_str(&info.label_field) {
            props.label = Some(label.to_string());
        }
        if let Some(category) = &class.category_name {
            props.category = self.category_cache.get(category).copied();
        }
        self.copy_properties(info, row, &mut props);
        if info.placement {
            let placement = row_placement(row);
            self.grow_project_extent(&placement)?;
            props.placement = Some(placement);
        }
        if classification.state == ItemState::New {
            if let Some(td) = &class.type_definition {
                props.type_definition = self.resolve_type_definition(td, row)?;
            }
        }

        let existing = match classification.existing_node {
            Some(id) => Some(id),
            None => self.graph.query_node_id_by_code(&props.code)?,
        };
        let node_id = match existing {
            Some(id) => {
                // Parent references and type definitions are written by
                // other passes (or earlier runs); an update must not wipe
                // them.
                let current = self
                    .graph
                    .get_node(id)
                    .map_err(|e| AlignError::write(&info.table, &item_id, e))?;
                props.parent = current.props.parent;
                if props.type_definition.is_none() {
                    props.type_definition = current.props.type_definition;
                }
                self.graph
                    .update_node(id, props)
                    .map_err(|e| AlignError::write(&info.table, &item_id, e))?;
                self.report.updated += 1;
                id
            }
            None => {
                let id = self
                    .graph
                    .insert_node(props)
                    .map_err(|e| AlignError::write(&info.table, &item_id, e))?;
                self.report.inserted += 1;
                id
            }
        };

        self.element_cache.insert(code, node_id);
        if self.config.unmanaged_policy.as_ref().is_some_and(|p| p.applies_to(&info.name)) {
            self.unmanaged_target = Some(node_id);
        }
        self.ledger.record(model_id, &item_id, &checksum, node_id)?;
        Ok(())
    }

    /// Copy declared extra properties from the row onto the node
    ///
    /// The declared property list comes from the registry override when
    /// present, otherwise from the schema provider. Each property reads the
    /// source column it was renamed from; missing and null values are
    /// simply not copied.
    fn copy_properties(&self, info: &NodeTypeInfo, row: &Row, props: &mut NodeProps) {
        let declared = info
            .extra_properties
            .as_deref()
            .or_else(|| self.schema.extra_properties(&info.name));
        let Some(declared) = declared else {
            return;
        };
        for property in declared {
            let column = self.schema.source_column(property).unwrap_or(property);
            let qualified = qualify(&info.table, column);
            match row.get(&qualified).filter(|v| !v.is_null()) {
                Some(value) => {
                    props.properties.insert(property.clone(), value.clone());
                }
                None => {
                    tracing::debug!(property, column = %qualified, "declared property absent from row");
                }
            }
        }
    }

    /// Fold a placement's world box into the project extent
    ///
    /// The stored extent is written back only when it actually grows, so
    /// re-runs over unchanged geometry are read-only here.
    fn grow_project_extent(&mut self, placement: &Placement) -> AlignResult<()> {
        let world = placement.world_extent();
        let stored = self.graph.project_extent()?;
        if !stored.contains(&world) {
            self.graph.update_project_extent(stored.union(&world))?;
        }
        Ok(())
    }

    /// Resolve the type-definition node a new node should reference
    ///
    /// Unresolvable definitions (missing key, unresolved model, no such
    /// node) leave the reference unset with a warning; they never fail the
    /// row.
    fn resolve_type_definition(
        &mut self,
        td: &TypeDefinitionSpec,
        row: &Row,
    ) -> AlignResult<Option<NodeId>> {
        let Some(key) = row.get_text(&td.key_field).filter(|k| !k.is_empty()) else {
            tracing::warn!(node_type = %td.node_type, key_field = %td.key_field, "type definition key missing");
            return Ok(None);
        };
        let Some(model_id) = self.model_id_by_name(&td.model_name) else {
            tracing::warn!(model = %td.model_name, "type definition model not resolved");
            return Ok(None);
        };
        let Ok(code) = self.codec.code_for(&td.node_type, model_id, &key) else {
            return Ok(None);
        };
        if let Some(id) = self.element_cache.get(&code) {
            return Ok(Some(*id));
        }
        let found = self.graph.query_node_id_by_code(&code)?;
        if found.is_none() {
            tracing::warn!(code = %code, "type definition node not found");
        }
        Ok(found)
    }
}

/// Placement for one row: zero by default, origin from joined coordinates
fn row_placement(row: &Row) -> Placement {
    if !row.has(COORD_ID) {
        return Placement::zero();
    }
    let origin = Point3::new(
        row.get_f64(COORD_X).unwrap_or(0.0),
        row.get_f64(COORD_Y).unwrap_or(0.0),
        row.get_f64(COORD_Z).unwrap_or(0.0),
    );
    Placement::at(origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_placement_defaults_to_zero() {
        let row = Row::new().with("Device.deviceid", "D1");
        assert_eq!(row_placement(&row), Placement::zero());
    }

    #[test]
    fn test_row_placement_reads_coordinates() {
        let row = Row::new()
            .with("Coordinate.id", "C1")
            .with("Coordinate.coordinatexaxis", 1.5)
            .with("Coordinate.coordinateyaxis", -2.0)
            .with("Coordinate.coordinatezaxis", 3.0);
        let placement = row_placement(&row);
        assert_eq!(placement.origin, Point3::new(1.5, -2.0, 3.0));
        assert!(placement.extent.is_null());
    }

    #[test]
    fn test_row_placement_partial_coordinates() {
        let row = Row::new()
            .with("Coordinate.id", "C1")
            .with("Coordinate.coordinatexaxis", 4.0);
        assert_eq!(row_placement(&row).origin, Point3::new(4.0, 0.0, 0.0));
    }
}
