//! Core types for rowsync
//!
//! This crate provides the shared vocabulary of the rowsync workspace:
//!
//! - **Values and rows**: the primitive [`Value`] sum type and the
//!   [`Row`] map of qualified column names to values
//! - **Stable identity**: [`StableCode`] and the [`IdentityCodec`] that
//!   derives deterministic codes from (type, container, key) triples
//! - **Content checksums**: order-independent SHA-256 over a row's full
//!   field set, used for change classification
//! - **Geometry**: [`Placement`] and [`Extent`] for node placement
//!   defaulting and monotonic project-extent growth
//!
//! Identity is the load-bearing concern: the same source row must map to
//! the same code value on every run, so a re-run classifies rows against
//! their previous state instead of rebuilding the graph.

pub mod checksum;
pub mod code;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod row;
pub mod value;

pub use checksum::{row_checksum, Checksum};
pub use code::{IdentityCodec, PrefixRule, StableCode};
pub use error::{CoreError, Result};
pub use geometry::{Extent, Placement, Point3, YawPitchRoll};
pub use ids::{CodeNamespaceId, ContainerId, NodeId};
pub use row::{qualify, Row};
pub use value::Value;
