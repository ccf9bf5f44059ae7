//! Schema provider contract
//!
//! The dynamic-schema subsystem is an external collaborator; the engine
//! consumes only its "what exists this run" signal: which node types are
//! declared, which extra properties each type carries, and the source
//! column → target property rename map. Schema diffing and version bumps
//! are that subsystem's concern, not this crate's.

use std::collections::HashMap;

/// "What exists this run" schema signal
pub trait SchemaProvider {
    /// Whether a node type is declared
    fn has_type(&self, type_name: &str) -> bool;

    /// Declared extra property names for a type, available for row copy
    ///
    /// `None` when the type is unknown; an empty slice when the type
    /// declares no extra properties.
    fn extra_properties(&self, type_name: &str) -> Option<&[String]>;

    /// Target property name for a source column, when renamed
    fn property_rename(&self, source_column: &str) -> Option<&str>;

    /// Source column a declared property was renamed from
    ///
    /// The materializer reads rows by source column but writes properties
    /// by declared name; this is the reverse of [`Self::property_rename`].
    fn source_column(&self, property_name: &str) -> Option<&str>;
}

/// Schema provider backed by static maps
///
/// Suits deployments whose schema is fixed at build time, and every test.
#[derive(Clone, Debug, Default)]
pub struct StaticSchemaProvider {
    types: HashMap<String, Vec<String>>,
    renames: HashMap<String, String>,
    reverse_renames: HashMap<String, String>,
}

impl StaticSchemaProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a type with its extra property names
    pub fn with_type(
        mut self,
        type_name: impl Into<String>,
        properties: Vec<String>,
    ) -> Self {
        self.types.insert(type_name.into(), properties);
        self
    }

    /// Add a source column → target property rename
    pub fn with_rename(
        mut self,
        source_column: impl Into<String>,
        target_property: impl Into<String>,
    ) -> Self {
        let source = source_column.into();
        let target = target_property.into();
        self.reverse_renames.insert(target.clone(), source.clone());
        self.renames.insert(source, target);
        self
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn has_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    fn extra_properties(&self, type_name: &str) -> Option<&[String]> {
        self.types.get(type_name).map(|v| v.as_slice())
    }

    fn property_rename(&self, source_column: &str) -> Option<&str> {
        self.renames.get(source_column).map(|s| s.as_str())
    }

    fn source_column(&self, property_name: &str) -> Option<&str> {
        self.reverse_renames.get(property_name).map(|s| s.as_str())
    }
}
