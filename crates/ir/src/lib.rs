//! # Warpgen IR
//!
//! The model a generator run is built from: entities with typed attributes,
//! connected by relationships that may be mirrored onto their targets.
//!
//! ## Core Concepts
//!
//! - **Attribute**: a typed field (e.g., `email`, `title`)
//! - **Entity**: a named set of attributes with derived class/table/route names
//! - **Relationship**: a typed edge, optionally mirrored onto its target
//! - **ModelGraph**: the arena that owns entities and keeps edge pairs consistent
//! - **Edge**: a relationship viewed from one of its ends
//!

// Module declarations
pub mod attribute;
pub mod entity;
pub mod graph;
pub mod presets;
pub mod relationship;

// Re-export commonly used types at crate root
pub use attribute::{Attribute, DefaultValue};
pub use entity::{Entity, EntityConfig};
pub use graph::{Edge, EdgeSide, ID_MEMBER, ModelGraph};
pub use relationship::{BackPopulates, Relationship};

// Re-export core types that are commonly used with IR
pub use warpgen_core::{
    DataType, EngineError, EngineResult, EntityId, RelationType, RelationshipId, Validatable,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Attribute, BackPopulates, DataType, DefaultValue, Edge, EdgeSide, EngineError,
        EngineResult, Entity, EntityConfig, EntityId, ModelGraph, RelationType, Relationship,
        Validatable,
    };
}
