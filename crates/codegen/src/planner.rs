//! Whole-model planning
//!
//! The `Planner` validates a model graph and plans every entity against one
//! layout: module locations per file kind, payload shapes and persistence.
//! Renderers consume the resulting [`ProjectPlan`]; nothing here writes
//! source text.

use serde::Serialize;
use tracing::{info, warn};
use warpgen_core::{EngineResult, Validatable};
use warpgen_ir::{Entity, ModelGraph};

use crate::layout::{FileKind, LayoutConfig};
use crate::persistence::{PersistencePlan, plan_persistence};
use crate::shapes::{ShapeFamily, plan_shapes};

// ============================================================================
// Plans
// ============================================================================

/// Location of one generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleLocation {
    pub kind: FileKind,
    pub path: String,
}

/// Everything planned for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPlan {
    pub entity: String,
    pub modules: Vec<ModuleLocation>,
    pub shapes: ShapeFamily,
    pub persistence: PersistencePlan,
}

impl EntityPlan {
    pub fn module(&self, kind: FileKind) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.path.as_str())
    }
}

/// Plans for every entity of a model, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPlan {
    pub name: String,
    pub entities: Vec<EntityPlan>,
    /// Entity whose module exposes authentication, if any
    pub auth_entity: Option<String>,
    pub warnings: Vec<String>,
}

impl ProjectPlan {
    pub fn entity(&self, name: &str) -> Option<&EntityPlan> {
        self.entities.iter().find(|e| e.entity == name)
    }

    pub fn module_count(&self) -> usize {
        self.entities.iter().map(|e| e.modules.len()).sum()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            project_name: self.name.clone(),
            entities: self.entities.len(),
            modules: self.module_count(),
            references: self
                .entities
                .iter()
                .map(|e| e.persistence.references.len())
                .sum(),
            association_tables: self
                .entities
                .iter()
                .map(|e| e.persistence.association_tables.len())
                .sum(),
            warnings: self.warnings.len(),
        }
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Plans a model graph against a layout
#[derive(Debug, Clone, Default)]
pub struct Planner {
    layout: LayoutConfig,
}

impl Planner {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Validate the layout and the graph, then plan every entity
    pub fn plan(&self, graph: &ModelGraph) -> EngineResult<ProjectPlan> {
        self.layout.validate()?;
        graph.validate()?;

        let mut warnings = Vec::new();
        let mut entities = Vec::with_capacity(graph.entity_count());
        for entity in graph.entities() {
            if entity.attributes().is_empty() && graph.all_relationships(entity.id())?.is_empty() {
                warn!(entity = entity.name(), "entity has no fields");
                warnings.push(format!(
                    "Entity '{}' has no attributes or relationships; its payloads only carry the id.",
                    entity.name()
                ));
            }
            entities.push(self.plan_entity(graph, entity)?);
        }

        let plan = ProjectPlan {
            name: graph.name().to_string(),
            entities,
            auth_entity: graph.auth_entity().map(|e| e.name().to_string()),
            warnings,
        };
        info!(
            project = %plan.name,
            entities = plan.entities.len(),
            warnings = plan.warnings.len(),
            "planning complete"
        );
        Ok(plan)
    }

    fn plan_entity(&self, graph: &ModelGraph, entity: &Entity) -> EngineResult<EntityPlan> {
        let modules = FileKind::all()
            .iter()
            .map(|kind| ModuleLocation {
                kind: *kind,
                path: self.layout.module_path(*kind, entity),
            })
            .collect();
        Ok(EntityPlan {
            entity: entity.name().to_string(),
            modules,
            shapes: plan_shapes(graph, entity.id(), &self.layout)?,
            persistence: plan_persistence(graph, entity.id(), &self.layout)?,
        })
    }
}

/// Plan a graph with the default layout
pub fn plan(graph: &ModelGraph) -> EngineResult<ProjectPlan> {
    Planner::default().plan(graph)
}

// ============================================================================
// Summary
// ============================================================================

/// Counts describing a completed plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub project_name: String,
    pub entities: usize,
    pub modules: usize,
    pub references: usize,
    pub association_tables: usize,
    pub warnings: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Project:            {}", self.project_name)?;
        writeln!(f, "Entities:           {}", self.entities)?;
        writeln!(f, "Modules:            {}", self.modules)?;
        writeln!(f, "References:         {}", self.references)?;
        writeln!(f, "Association tables: {}", self.association_tables)?;
        write!(f, "Warnings:           {}", self.warnings)
    }
}

// ============================================================================
// Tests
// ============================================================================
