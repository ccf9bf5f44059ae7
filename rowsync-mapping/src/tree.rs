//! The declarative mapping tree
//!
//! `Subject → {Partition → {Model → {Elements | ElementClasses |
//! RelationshipClasses}}}`. Elements are singletons created once per run
//! (e.g. a category); element classes are table-driven (one node per
//! source row); relationship classes are table-driven (one relationship or
//! embedded reference per source row, resolved via named source/target
//! lookups).
//!
//! The tree is data, not behavior: every variant carries its own typed
//! configuration and the alignment driver pattern-matches over it in a
//! fixed pre-order.

use crate::error::{MappingError, MappingResult};
use crate::registry::NodeTypeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The kind of a partition (and of the model it sub-models)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionKind {
    /// Definition elements: types, categories
    Definition,
    /// Physical elements with placement
    Physical,
    /// Spatial-location elements (facilities, floors, spaces)
    SpatialLocation,
    /// Plain information records
    InformationRecord,
    /// Grouping elements (zones, systems)
    GroupInformation,
    /// Document records
    Document,
    /// Functional elements (devices, datapoints)
    Functional,
}

/// The kind of a singleton category element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Category for spatially-placed nodes
    Spatial,
    /// Category for drawing graphics
    Drawing,
}

/// A singleton element created once per run
///
/// The only singleton kind the engine materializes directly is a category;
/// other container bootstrap (partitions, models) happens through the
/// container resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementSpec {
    /// A named category under the containing model
    Category {
        /// Globally unique category name, referenced by element classes
        name: String,
        /// Spatial or drawing
        kind: CategoryKind,
    },
}

impl ElementSpec {
    /// Create a spatial category element
    pub fn spatial_category(name: impl Into<String>) -> Self {
        ElementSpec::Category {
            name: name.into(),
            kind: CategoryKind::Spatial,
        }
    }

    /// Create a drawing category element
    pub fn drawing_category(name: impl Into<String>) -> Self {
        ElementSpec::Category {
            name: name.into(),
            kind: CategoryKind::Drawing,
        }
    }

    /// The element's name
    pub fn name(&self) -> &str {
        match self {
            ElementSpec::Category { name, .. } => name,
        }
    }
}

/// A second-table lookup assigning a type-definition node to new nodes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinitionSpec {
    /// Node type of the definition node
    pub node_type: String,
    /// Model containing the definition node
    pub model_name: String,
    /// Qualified row field holding the definition's key value
    pub key_field: String,
}

impl TypeDefinitionSpec {
    /// Create a type definition spec
    pub fn new(
        node_type: impl Into<String>,
        model_name: impl Into<String>,
        key_field: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            model_name: model_name.into(),
            key_field: key_field.into(),
        }
    }
}

/// A table-driven element class: one target node per source row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementClassSpec {
    /// Logical node type; the registry supplies its backing table and label field
    pub node_type: String,
    /// Category assigned to materialized nodes, if any
    pub category_name: Option<String>,
    /// Optional type-definition link assigned on first materialization
    pub type_definition: Option<TypeDefinitionSpec>,
}

impl ElementClassSpec {
    /// Create an element class for a node type
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            category_name: None,
            type_definition: None,
        }
    }

    /// Assign a category to materialized nodes
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Assign a type-definition link
    pub fn with_type_definition(mut self, spec: TypeDefinitionSpec) -> Self {
        self.type_definition = Some(spec);
        self
    }
}

/// How a relationship row is realized in the graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// A first-class edge record, at most one per (source, target, type)
    Relationship,
    /// A parent/embedding reference stored on the child node itself
    EmbeddedReference,
}

/// One endpoint of a relationship class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Node type of the endpoint (subject to key-prefix dispatch)
    pub node_type: String,
    /// Model whose scope the endpoint's code lives under
    pub model_name: String,
    /// Qualified row field holding the endpoint's key value
    pub key_field: String,
}

impl EndpointSpec {
    /// Create an endpoint spec
    pub fn new(
        node_type: impl Into<String>,
        model_name: impl Into<String>,
        key_field: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            model_name: model_name.into(),
            key_field: key_field.into(),
        }
    }
}

/// A table-driven relationship class: one edge or embedded reference per row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationshipClassSpec {
    /// Mapping-local name, used in diagnostics
    pub name: String,
    /// Relationship type written to the graph
    pub relationship_type: String,
    /// Edge record or embedded reference
    pub kind: RelationshipKind,
    /// Backing table whose rows drive resolution
    pub table: String,
    /// Source endpoint lookup
    pub source: EndpointSpec,
    /// Target endpoint lookup
    pub target: EndpointSpec,
}

impl RelationshipClassSpec {
    /// Create a first-class relationship spec
    pub fn relationship(
        name: impl Into<String>,
        relationship_type: impl Into<String>,
        table: impl Into<String>,
        source: EndpointSpec,
        target: EndpointSpec,
    ) -> Self {
        Self {
            name: name.into(),
            relationship_type: relationship_type.into(),
            kind: RelationshipKind::Relationship,
            table: table.into(),
            source,
            target,
        }
    }

    /// Create an embedded-reference spec
    pub fn embedded_reference(
        name: impl Into<String>,
        relationship_type: impl Into<String>,
        table: impl Into<String>,
        source: EndpointSpec,
        target: EndpointSpec,
    ) -> Self {
        Self {
            name: name.into(),
            relationship_type: relationship_type.into(),
            kind: RelationshipKind::EmbeddedReference,
            table: table.into(),
            source,
            target,
        }
    }
}

/// A model: the container that scopes node codes and holds the table-driven classes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model name, unique across the whole tree
    pub name: String,
    /// Singleton elements created once per run
    pub elements: Vec<ElementSpec>,
    /// Table-driven element classes
    pub element_classes: Vec<ElementClassSpec>,
    /// Table-driven relationship classes, resolved after all element passes
    pub relationship_classes: Vec<RelationshipClassSpec>,
}

impl ModelSpec {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a singleton element
    pub fn with_element(mut self, element: ElementSpec) -> Self {
        self.elements.push(element);
        self
    }

    /// Add an element class
    pub fn with_element_class(mut self, class: ElementClassSpec) -> Self {
        self.element_classes.push(class);
        self
    }

    /// Add a relationship class
    pub fn with_relationship_class(mut self, class: RelationshipClassSpec) -> Self {
        self.relationship_classes.push(class);
        self
    }
}

/// A partition grouping models of one kind under a subject
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionSpec {
    /// Partition name, unique under its subject
    pub name: String,
    /// Partition kind
    pub kind: PartitionKind,
    /// Models under this partition
    pub models: Vec<ModelSpec>,
}

impl PartitionSpec {
    /// Create an empty partition
    pub fn new(name: impl Into<String>, kind: PartitionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            models: Vec::new(),
        }
    }

    /// Add a model
    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.models.push(model);
        self
    }
}

/// A top-level subject
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubjectSpec {
    /// Subject name
    pub name: String,
    /// Partitions under this subject
    pub partitions: Vec<PartitionSpec>,
}

impl SubjectSpec {
    /// Create an empty subject
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: Vec::new(),
        }
    }

    /// Add a partition
    pub fn with_partition(mut self, partition: PartitionSpec) -> Self {
        self.partitions.push(partition);
        self
    }
}

/// The complete mapping tree
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingTree {
    /// Top-level subjects, traversed in order
    pub subjects: Vec<SubjectSpec>,
}

impl MappingTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subject
    pub fn with_subject(mut self, subject: SubjectSpec) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Iterate every model in pre-order
    pub fn models(&self) -> impl Iterator<Item = &ModelSpec> {
        self.subjects
            .iter()
            .flat_map(|s| s.partitions.iter())
            .flat_map(|p| p.models.iter())
    }

    /// Every node type the tree references (element classes, endpoints,
    /// type definitions), deduplicated
    pub fn referenced_node_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut types = Vec::new();
        for model in self.models() {
            for class in &model.element_classes {
                if seen.insert(class.node_type.as_str()) {
                    types.push(class.node_type.as_str());
                }
                if let Some(td) = &class.type_definition {
                    if seen.insert(td.node_type.as_str()) {
                        types.push(td.node_type.as_str());
                    }
                }
            }
            for rel in &model.relationship_classes {
                for endpoint in [&rel.source, &rel.target] {
                    if seen.insert(endpoint.node_type.as_str()) {
                        types.push(endpoint.node_type.as_str());
                    }
                }
            }
        }
        types
    }

    /// Validate structural invariants against a node-type registry
    ///
    /// Checks: model and element names are unique tree-wide, relationship
    /// endpoints and type definitions reference known models, category
    /// references resolve to a singleton element somewhere in the tree,
    /// and every referenced node type is registered.
    pub fn validate(&self, registry: &NodeTypeRegistry) -> MappingResult<()> {
        let mut model_names = HashSet::new();
        let mut element_names = HashSet::new();

        for model in self.models() {
            if !model_names.insert(model.name.as_str()) {
                return Err(MappingError::DuplicateModel(model.name.clone()));
            }
            for element in &model.elements {
                if !element_names.insert(element.name()) {
                    return Err(MappingError::DuplicateElement(element.name().to_string()));
                }
            }
        }

        for model in self.models() {
            for class in &model.element_classes {
                if let Some(category) = &class.category_name {
                    if !element_names.contains(category.as_str()) {
                        return Err(MappingError::UnknownCategory {
                            node_type: class.node_type.clone(),
                            category: category.clone(),
                        });
                    }
                }
                if let Some(td) = &class.type_definition {
                    if !model_names.contains(td.model_name.as_str()) {
                        return Err(MappingError::UnknownTypeDefinitionModel {
                            node_type: class.node_type.clone(),
                            model: td.model_name.clone(),
                        });
                    }
                }
            }
            for rel in &model.relationship_classes {
                for endpoint in [&rel.source, &rel.target] {
                    if !model_names.contains(endpoint.model_name.as_str()) {
                        return Err(MappingError::UnknownEndpointModel {
                            relationship: rel.name.clone(),
                            model: endpoint.model_name.clone(),
                        });
                    }
                }
            }
        }

        for type_name in self.referenced_node_types() {
            if !registry.contains(type_name) {
                return Err(MappingError::UnknownNodeType(type_name.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{NodeTypeInfo, NodeTypeRegistry};

    fn registry() -> NodeTypeRegistry {
        let mut registry = NodeTypeRegistry::new();
        registry.register(NodeTypeInfo::new("Component", "Component", "Component.name").with_placement());
        registry.register(NodeTypeInfo::new("Type", "Type", "Type.name"));
        registry
    }

    fn sample_tree() -> MappingTree {
        MappingTree::new().with_subject(
            SubjectSpec::new("Subject1")
                .with_partition(
                    PartitionSpec::new("DefinitionPartition1", PartitionKind::Definition)
                        .with_model(
                            ModelSpec::new("DefinitionModel1")
                                .with_element(ElementSpec::spatial_category("SpatialCategory1"))
                                .with_element_class(ElementClassSpec::new("Type")),
                        ),
                )
                .with_partition(
                    PartitionSpec::new("PhysicalPartition1", PartitionKind::Physical).with_model(
                        ModelSpec::new("PhysicalModel1")
                            .with_element_class(
                                ElementClassSpec::new("Component")
                                    .with_category("SpatialCategory1")
                                    .with_type_definition(TypeDefinitionSpec::new(
                                        "Type",
                                        "DefinitionModel1",
                                        "Component.typename",
                                    )),
                            )
                            .with_relationship_class(RelationshipClassSpec::relationship(
                                "ComponentConnectsToComponent",
                                "ComponentConnectsToComponent",
                                "Connection",
                                EndpointSpec::new("Component", "PhysicalModel1", "Connection.rowname1"),
                                EndpointSpec::new("Component", "PhysicalModel1", "Connection.rowname2"),
                            )),
                    ),
                ),
        )
    }

    #[test]
    fn test_valid_tree_passes() {
        sample_tree().validate(&registry()).unwrap();
    }

    #[test]
    fn test_models_preorder() {
        let tree = sample_tree();
        let names: Vec<&str> = tree.models().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["DefinitionModel1", "PhysicalModel1"]);
    }

    #[test]
    fn test_referenced_node_types() {
        let tree = sample_tree();
        let mut types = tree.referenced_node_types();
        types.sort_unstable();
        assert_eq!(types, vec!["Component", "Type"]);
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let tree = MappingTree::new().with_subject(
            SubjectSpec::new("S").with_partition(
                PartitionSpec::new("P", PartitionKind::Physical)
                    .with_model(ModelSpec::new("M"))
                    .with_model(ModelSpec::new("M")),
            ),
        );
        let err = tree.validate(&registry()).unwrap_err();
        assert!(matches!(err, MappingError::DuplicateModel(name) if name == "M"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let tree = MappingTree::new().with_subject(
            SubjectSpec::new("S").with_partition(
                PartitionSpec::new("P", PartitionKind::Physical).with_model(
                    ModelSpec::new("M").with_element_class(
                        ElementClassSpec::new("Component").with_category("Nowhere"),
                    ),
                ),
            ),
        );
        let err = tree.validate(&registry()).unwrap_err();
        assert!(matches!(err, MappingError::UnknownCategory { .. }));
    }

    #[test]
    fn test_unknown_endpoint_model_rejected() {
        let tree = MappingTree::new().with_subject(
            SubjectSpec::new("S").with_partition(
                PartitionSpec::new("P", PartitionKind::Physical).with_model(
                    ModelSpec::new("M").with_relationship_class(
                        RelationshipClassSpec::relationship(
                            "R",
                            "R",
                            "Connection",
                            EndpointSpec::new("Component", "M", "Connection.a"),
                            EndpointSpec::new("Component", "Missing", "Connection.b"),
                        ),
                    ),
                ),
            ),
        );
        let err = tree.validate(&registry()).unwrap_err();
        assert!(matches!(err, MappingError::UnknownEndpointModel { .. }));
    }

    // Mapping trees are deployment data; they must load from JSON config.
    #[test]
    fn test_tree_loads_from_json() {
        let json = r#"{
            "subjects": [{
                "name": "Plant",
                "partitions": [{
                    "name": "Physical",
                    "kind": "Physical",
                    "models": [{
                        "name": "PhysicalModel",
                        "elements": [{"Category": {"name": "EquipmentCategory", "kind": "Spatial"}}],
                        "element_classes": [{
                            "node_type": "Component",
                            "category_name": "EquipmentCategory",
                            "type_definition": null
                        }],
                        "relationship_classes": []
                    }]
                }]
            }]
        }"#;
        let tree: MappingTree = serde_json::from_str(json).unwrap();
        tree.validate(&registry()).unwrap();
        let model = tree.models().next().unwrap();
        assert_eq!(model.name, "PhysicalModel");
        assert_eq!(model.elements[0].name(), "EquipmentCategory");
        assert_eq!(model.element_classes[0].category_name.as_deref(), Some("EquipmentCategory"));
    }

    #[test]
    fn test_unregistered_type_rejected() {
        let tree = MappingTree::new().with_subject(
            SubjectSpec::new("S").with_partition(
                PartitionSpec::new("P", PartitionKind::Physical)
                    .with_model(ModelSpec::new("M").with_element_class(ElementClassSpec::new("Ghost"))),
            ),
        );
        let err = tree.validate(&registry()).unwrap_err();
        assert!(matches!(err, MappingError::UnknownNodeType(name) if name == "Ghost"));
    }
}
