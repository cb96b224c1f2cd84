//! # Warpgen Codegen
//!
//! Planning layer between the model graph and the renderers that emit
//! application source.
//!
//! ## Features
//!
//! - **Module references**: relative imports between generated modules
//! - **Layout**: where each module lives and what its classes are called
//! - **Shape planning**: read/create/edit payload classes with a shared base
//! - **Persistence planning**: columns, foreign keys, references and join tables
//! - **Planner**: validates a whole graph and plans every entity
//!

// ============================================================================
// Modules
// ============================================================================

pub mod layout;
pub mod minimize;
pub mod module_path;
pub mod persistence;
pub mod planner;
pub mod shapes;

// ============================================================================
// Re-exports
// ============================================================================

pub use layout::{ClassSuffixes, FileKind, FolderLayout, LayoutConfig};
pub use minimize::{FactoredSet, Factoring, OrderedSet, extract_common, factor, inherits};
pub use module_path::{MAX_ASCENT, resolve_reference};
pub use persistence::{
    AssociationColumn, AssociationImport, AssociationTable, Cascade, ColumnPlan, ForeignKeyPlan,
    PersistencePlan, ReferencePlan, plan_persistence,
};
pub use planner::{EntityPlan, ModuleLocation, PlanSummary, Planner, ProjectPlan, plan};
pub use shapes::{ShapeClass, ShapeFamily, ShapeField, payload_fields, plan_shapes};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Cascade, FileKind, LayoutConfig, PersistencePlan, Planner, ProjectPlan, ShapeFamily,
        extract_common, plan, plan_persistence, plan_shapes, resolve_reference,
    };
}
