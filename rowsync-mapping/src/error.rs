//! Mapping validation errors

use thiserror::Error;

/// Mapping-specific errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// Two models in the tree share a name
    #[error("Duplicate model name: {0}")]
    DuplicateModel(String),

    /// Two singleton elements in the tree share a name
    #[error("Duplicate element name: {0}")]
    DuplicateElement(String),

    /// A relationship endpoint references a model the tree does not define
    #[error("Relationship '{relationship}' references unknown model '{model}'")]
    UnknownEndpointModel {
        relationship: String,
        model: String,
    },

    /// An element class references a category with no matching singleton element
    #[error("Element class '{node_type}' references unknown category '{category}'")]
    UnknownCategory { node_type: String, category: String },

    /// A type definition references a model the tree does not define
    #[error("Type definition for '{node_type}' references unknown model '{model}'")]
    UnknownTypeDefinitionModel { node_type: String, model: String },

    /// A node type used by the tree is missing from the registry
    #[error("Node type not registered: {0}")]
    UnknownNodeType(String),
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
