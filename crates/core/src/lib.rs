//! # Warpgen Core
//!
//! Core types, naming rules, traits, and error handling for Warpgen.
//!
//! This crate provides the foundational building blocks used by the model
//! and planning crates:
//!
//! - **Naming**: snake_case validation and class/plural/table/route derivation
//! - **Types**: the `DataType` tag and `RelationType` cardinality
//! - **Traits**: `Validatable`
//! - **Errors**: unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod naming;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult, ResultExt};
pub use naming::{derive_class_name, derive_plural, derive_route_name, is_snake_case, validate_name};
pub use traits::Validatable;
pub use types::{DataType, EntityId, RelationType, RelationshipId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
