//! Node-type capability table
//!
//! Node kinds are a flat registry, not an inheritance chain: each logical
//! type carries its backing table, the row field its label comes from, and
//! whether placement applies. The alignment engine resolves capabilities by
//! lookup and never dispatches on a type hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Capabilities of one logical node type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeInfo {
    /// Logical type name, also the first half of code values
    pub name: String,
    /// Source table backing this type
    pub table: String,
    /// Qualified row field the node's user-facing label is copied from
    pub label_field: String,
    /// Whether materialized nodes carry a placement
    pub placement: bool,
    /// Extra-property override; `None` defers to the schema provider
    pub extra_properties: Option<Vec<String>>,
}

impl NodeTypeInfo {
    /// Create a type with no placement and schema-provided properties
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        label_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            label_field: label_field.into(),
            placement: false,
            extra_properties: None,
        }
    }

    /// Mark the type as placement-bearing
    pub fn with_placement(mut self) -> Self {
        self.placement = true;
        self
    }

    /// Override the schema-declared extra-property list
    pub fn with_extra_properties(mut self, properties: Vec<String>) -> Self {
        self.extra_properties = Some(properties);
        self
    }
}

/// Flat name → capability lookup for all node types of a deployment
#[derive(Clone, Debug, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<String, NodeTypeInfo>,
}

impl NodeTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type, replacing any previous entry with the same name
    pub fn register(&mut self, info: NodeTypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<&NodeTypeInfo> {
        self.types.get(name)
    }

    /// Whether a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate registered type names
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = NodeTypeRegistry::new();
        registry.register(
            NodeTypeInfo::new("Component", "Component", "Component.name").with_placement(),
        );
        registry.register(NodeTypeInfo::new("Type", "Type", "Type.name"));

        assert_eq!(registry.len(), 2);
        let component = registry.get("Component").unwrap();
        assert!(component.placement);
        assert_eq!(component.table, "Component");
        assert!(!registry.get("Type").unwrap().placement);
        assert!(!registry.contains("Ghost"));
    }

    #[test]
    fn test_reregister_replaces() {
        let mut registry = NodeTypeRegistry::new();
        registry.register(NodeTypeInfo::new("Device", "Device", "Device.deviceid"));
        registry.register(
            NodeTypeInfo::new("Device", "Device", "Device.deviceid")
                .with_extra_properties(vec!["devicetype".to_string()]),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Device").unwrap().extra_properties.is_some());
    }
}
