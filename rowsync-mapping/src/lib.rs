//! Declarative mapping for rowsync
//!
//! This crate describes *what* to synchronize; the alignment engine in
//! `rowsync-align` interprets it. Three pieces:
//!
//! - [`MappingTree`]: the subjects → partitions → models →
//!   {elements | element classes | relationship classes} hierarchy as a
//!   tagged-variant tree interpreted by pattern matching, not a type
//!   hierarchy
//! - [`NodeTypeRegistry`]: a flat capability table per logical node type
//!   (backing table, label field, placement applicability) replacing
//!   inheritance chains with lookup
//! - Policies: [`UnmanagedNodePolicy`] for the pre-existing universal
//!   join target, and the key-prefix dispatch rules re-exported from
//!   `rowsync-core`
//!
//! The tree is a load-time constant: built once, validated once, and read
//! immutably for the duration of every run.

pub mod error;
pub mod policy;
pub mod registry;
pub mod tree;

pub use error::{MappingError, MappingResult};
pub use policy::UnmanagedNodePolicy;
pub use registry::{NodeTypeInfo, NodeTypeRegistry};
pub use rowsync_core::PrefixRule;
pub use tree::{
    CategoryKind, ElementClassSpec, ElementSpec, EndpointSpec, MappingTree, ModelSpec,
    PartitionKind, PartitionSpec, RelationshipClassSpec, RelationshipKind, SubjectSpec,
    TypeDefinitionSpec,
};
