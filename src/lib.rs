//! # Warpgen
//!
//! Modeling and reference-resolution core of a web application source
//! generator.
//!
//! Describe entities and their relationships in a [`ModelGraph`], then plan
//! them against a [`LayoutConfig`]:
//!
//! ```rust,ignore
//! use warpgen::prelude::*;
//!
//! let mut graph = ModelGraph::new("blog")?;
//! let (user, _) = warpgen::ir::presets::install_user_with_role(&mut graph)?;
//! let post = graph.add_entity(Entity::new("post")?)?;
//! graph.add_many_to_one(post, user, "author", Some("posts"), false)?;
//!
//! let plan = Planner::new(LayoutConfig::default()).plan(&graph)?;
//! println!("{}", plan.summary());
//! ```

pub use warpgen_codegen as codegen;
pub use warpgen_core as model_core;
pub use warpgen_ir as ir;

pub use warpgen_codegen::{LayoutConfig, Planner, ProjectPlan, plan};
pub use warpgen_core::{EngineError, EngineResult};
pub use warpgen_ir::ModelGraph;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,warpgen=info,warpgen_ir=info,warpgen_codegen=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`, else [`DEFAULT_FILTER`]
pub fn init_tracing() -> EngineResult<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER));
    install(filter.map_err(|e| EngineError::config(e.to_string()))?)
}

/// Install a global fmt subscriber with an explicit filter
pub fn init_tracing_with_filter(directives: &str) -> EngineResult<()> {
    let filter = EnvFilter::try_new(directives).map_err(|e| EngineError::config(e.to_string()))?;
    install(filter)
}

fn install(filter: EnvFilter) -> EngineResult<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| EngineError::config(format!("tracing already initialised: {e}")))?;
    tracing::debug!(version = VERSION, "tracing initialised");
    Ok(())
}

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use warpgen_codegen::prelude::*;
    pub use warpgen_ir::prelude::*;
}
