//! Alignment driver
//!
//! The driver walks the mapping tree in a strict pre-order — subjects,
//! then partitions, then models, and within each model: singleton
//! elements, element classes, relationship classes — and drives the
//! resolver/materializer components. Relationship resolution for a model
//! never starts before both materializing phases for that model have
//! completed, because edges depend on nodes.
//!
//! A run is bracketed by the schema preflight and source-document gate at
//! the front, and the deletion sweep at the back: every source item under
//! a touched container that was not seen this run is deleted from the
//! graph and dropped from the ledger. A model whose passes failed is not
//! a touched container — its rows were never observed this run, and
//! sweeping them would delete nodes whose source rows still exist. The
//! document record likewise advances only after a run with no failed
//! passes, so failed rows are retried even under an unchanged version
//! stamp.
//!
//! Failure handling follows the blast radii in [`crate::error`]: row
//! failures never abort the traversal, container failures abort one
//! model's subtree, schema failures abort the run before any writes.

use crate::error::{AlignError, AlignResult};
use rowsync_core::{ContainerId, IdentityCodec, NodeId, PrefixRule, StableCode};
use rowsync_mapping::{
    MappingTree, ModelSpec, NodeTypeRegistry, PartitionSpec, SubjectSpec, UnmanagedNodePolicy,
};
use rowsync_store::{ChangeLedger, DocumentState, GraphStore, RowSource, SchemaProvider};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the source document feeding a run
///
/// Recording it in the ledger lets an unchanged document (same version
/// stamp) skip the whole run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Stable document id (a path, usually)
    pub id: String,
    /// Version stamp (modification time, revision, hash)
    pub version: String,
}

impl SourceDocument {
    /// Create a source document identity
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// Run-level configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Code namespace name for this mapping deployment
    pub namespace: String,
    /// Key-prefix dispatch rules for the identity codec
    pub prefix_rules: Vec<PrefixRule>,
    /// Optional unmanaged-node policy
    pub unmanaged_policy: Option<UnmanagedNodePolicy>,
    /// Optional source-document gate
    pub document: Option<SourceDocument>,
}

impl AlignConfig {
    /// Create a config with just a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            prefix_rules: Vec::new(),
            unmanaged_policy: None,
            document: None,
        }
    }

    /// Add a key-prefix dispatch rule
    pub fn with_prefix_rule(mut self, rule: PrefixRule) -> Self {
        self.prefix_rules.push(rule);
        self
    }

    /// Set the unmanaged-node policy
    pub fn with_unmanaged_policy(mut self, policy: UnmanagedNodePolicy) -> Self {
        self.unmanaged_policy = Some(policy);
        self
    }

    /// Set the source-document gate
    pub fn with_document(mut self, document: SourceDocument) -> Self {
        self.document = Some(document);
        self
    }
}

/// Counters describing what one run did
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Nodes inserted
    pub inserted: usize,
    /// Nodes updated in place
    pub updated: usize,
    /// Rows classified Unchanged (no write)
    pub unchanged: usize,
    /// Rows skipped (empty key, unresolved endpoint, source row problems)
    pub skipped_rows: usize,
    /// First-class relationship instances inserted
    pub relationships_inserted: usize,
    /// Embedded references actually written (idempotent re-sets excluded)
    pub references_set: usize,
    /// Nodes deleted by the sweep
    pub swept: usize,
    /// Models whose subtree was aborted
    pub models_failed: usize,
    /// Element-class or relationship passes aborted by source failures
    pub passes_failed: usize,
    /// Whether the source-document gate skipped the run entirely
    pub document_unchanged: bool,
}

impl RunReport {
    /// Total graph writes performed by the run
    pub fn writes(&self) -> usize {
        self.inserted + self.updated + self.relationships_inserted + self.references_set
    }
}

/// Driver phase, in traversal order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    WalkingSubjects,
    WalkingPartitions,
    WalkingModels,
    MaterializingElements,
    MaterializingElementClasses,
    ResolvingRelationships,
    SweepingDeletions,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::WalkingSubjects => "walking-subjects",
            Phase::WalkingPartitions => "walking-partitions",
            Phase::WalkingModels => "walking-models",
            Phase::MaterializingElements => "materializing-elements",
            Phase::MaterializingElementClasses => "materializing-element-classes",
            Phase::ResolvingRelationships => "resolving-relationships",
            Phase::SweepingDeletions => "sweeping-deletions",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// The alignment engine
///
/// Owns every run-scoped cache exclusively: model and category name → id,
/// code → node id, the unmanaged fallback target, and the list of touched
/// containers for the sweep. A new `Aligner` is built per run; nothing
/// here outlives one.
pub struct Aligner<'a, G, L, S, R> {
    pub(crate) graph: &'a mut G,
    pub(crate) ledger: &'a mut L,
    pub(crate) schema: &'a S,
    pub(crate) source: &'a R,
    pub(crate) registry: &'a NodeTypeRegistry,
    pub(crate) config: AlignConfig,
    pub(crate) codec: IdentityCodec,
    pub(crate) model_cache: FxHashMap<String, ContainerId>,
    pub(crate) category_cache: FxHashMap<String, ContainerId>,
    pub(crate) element_cache: FxHashMap<StableCode, NodeId>,
    pub(crate) touched: Vec<ContainerId>,
    pub(crate) unmanaged_target: Option<NodeId>,
    pub(crate) phase: Phase,
    pub(crate) report: RunReport,
}

impl<'a, G, L, S, R> Aligner<'a, G, L, S, R>
where
    G: GraphStore,
    L: ChangeLedger,
    S: SchemaProvider,
    R: RowSource,
{
    /// Create an aligner for one run
    pub fn new(
        graph: &'a mut G,
        ledger: &'a mut L,
        schema: &'a S,
        source: &'a R,
        registry: &'a NodeTypeRegistry,
        config: AlignConfig,
    ) -> Self {
        Self {
            graph,
            ledger,
            schema,
            source,
            registry,
            config,
            codec: IdentityCodec::default(),
            model_cache: FxHashMap::default(),
            category_cache: FxHashMap::default(),
            element_cache: FxHashMap::default(),
            touched: Vec::new(),
            unmanaged_target: None,
            phase: Phase::Idle,
            report: RunReport::default(),
        }
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase) {
        tracing::debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Align the target graph with the source, per the mapping tree
    ///
    /// Consumes the aligner: caches must not outlive the run.
    pub fn run(mut self, tree: &MappingTree) -> AlignResult<RunReport> {
        tree.validate(self.registry)?;
        self.schema_preflight(tree)?;

        if let Some(document) = &self.config.document {
            let state = self.ledger.document_state(&document.id, &document.version)?;
            if state == DocumentState::Unchanged {
                tracing::info!(document = %document.id, "source document unchanged, skipping run");
                self.report.document_unchanged = true;
                return Ok(self.report);
            }
        }

        self.ledger.begin_run()?;
        let namespace = self.graph.ensure_code_namespace(&self.config.namespace)?;
        self.codec =
            IdentityCodec::with_prefix_rules(namespace, self.config.prefix_rules.clone());

        self.enter_phase(Phase::WalkingSubjects);
        for subject in &tree.subjects {
            if let Err(error) = self.process_subject(subject) {
                if matches!(error, AlignError::SchemaUnavailable(_)) {
                    return Err(error);
                }
                tracing::error!(subject = %subject.name, %error, "subject aborted");
                self.report.models_failed += subject
                    .partitions
                    .iter()
                    .map(|p| p.models.len())
                    .sum::<usize>();
            }
        }

        self.enter_phase(Phase::SweepingDeletions);
        self.sweep()?;

        self.enter_phase(Phase::Done);
        if self.report.models_failed == 0 && self.report.passes_failed == 0 {
            if let Some(document) = &self.config.document {
                self.ledger.record_document(&document.id, &document.version)?;
            }
        }
        tracing::info!(
            inserted = self.report.inserted,
            updated = self.report.updated,
            unchanged = self.report.unchanged,
            skipped = self.report.skipped_rows,
            relationships = self.report.relationships_inserted,
            references = self.report.references_set,
            swept = self.report.swept,
            "alignment run complete"
        );
        Ok(self.report)
    }

    /// Every node type the tree references must be known before any write
    fn schema_preflight(&self, tree: &MappingTree) -> AlignResult<()> {
        for type_name in tree.referenced_node_types() {
            if !self.schema.has_type(type_name) {
                return Err(AlignError::SchemaUnavailable(type_name.to_string()));
            }
        }
        Ok(())
    }

    fn process_subject(&mut self, subject: &SubjectSpec) -> AlignResult<()> {
        let subject_id = self
            .resolve_subject(subject)
            .map_err(|e| AlignError::container(&subject.name, e))?;

        self.enter_phase(Phase::WalkingPartitions);
        for partition in &subject.partitions {
            self.enter_phase(Phase::WalkingModels);
            for model in &partition.models {
                match self.process_model(subject_id, partition, model) {
                    Ok(()) => {}
                    Err(error @ AlignError::SchemaUnavailable(_)) => return Err(error),
                    Err(error) => {
                        tracing::error!(
                            model = %model.name,
                            partition = %partition.name,
                            %error,
                            "model subtree aborted"
                        );
                        self.report.models_failed += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Process one model: elements, then element classes, then relationships
    fn process_model(
        &mut self,
        subject_id: ContainerId,
        partition: &PartitionSpec,
        model: &ModelSpec,
    ) -> AlignResult<()> {
        let model_id = self
            .resolve_model(subject_id, partition, model)
            .map_err(|e| AlignError::container(&model.name, e))?;
        let mut clean = true;

        self.enter_phase(Phase::MaterializingElements);
        for element in &model.elements {
            self.materialize_element(model_id, element)
                .map_err(|e| AlignError::container(element.name(), e))?;
        }

        self.enter_phase(Phase::MaterializingElementClasses);
        for class in &model.element_classes {
            if let Err(error) = self.materialize_element_class(model_id, class) {
                match error {
                    AlignError::Source { .. } => {
                        // Fatal to this table only; sibling classes proceed
                        tracing::error!(
                            model = %model.name,
                            node_type = %class.node_type,
                            %error,
                            "element class pass aborted"
                        );
                        self.report.passes_failed += 1;
                        clean = false;
                    }
                    other => return Err(other),
                }
            }
        }

        self.enter_phase(Phase::ResolvingRelationships);
        for relationship in &model.relationship_classes {
            if let Err(error) = self.resolve_relationship_class(relationship) {
                match error {
                    AlignError::Source { .. } => {
                        tracing::error!(
                            model = %model.name,
                            relationship = %relationship.name,
                            %error,
                            "relationship class pass aborted"
                        );
                        self.report.passes_failed += 1;
                        clean = false;
                    }
                    other => return Err(other),
                }
            }
        }

        // A model with a failed pass never enters the sweep: its rows were
        // not observed, so unseen ledger records prove nothing.
        if clean {
            self.touched.push(model_id);
        } else {
            tracing::warn!(model = %model.name, "model had failed passes, excluded from sweep");
        }

        Ok(())
    }

    /// Delete every node whose backing row disappeared from the source
    fn sweep(&mut self) -> AlignResult<()> {
        let mut containers = self.touched.clone();
        containers.sort_unstable();
        containers.dedup();

        for container in containers {
            let deleted = self.ledger.sweep_unseen(container)?;
            for node_id in deleted {
                match self.graph.delete_node(node_id) {
                    Ok(()) => {
                        tracing::debug!(%node_id, %container, "swept deleted node");
                        self.report.swept += 1;
                    }
                    Err(error) => {
                        // The ledger record is already gone; a next run
                        // simply re-inserts if the row reappears.
                        tracing::warn!(%node_id, %error, "sweep could not delete node");
                    }
                }
            }
        }
        Ok(())
    }
}
