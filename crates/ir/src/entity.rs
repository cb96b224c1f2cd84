//! Entity definitions
//!
//! An `Entity` is a named collection of attributes that becomes a family of
//! generated classes. It also records which relationships it owns and which
//! mirrored relationships point back at it; those lists are only ever
//! appended to by [`ModelGraph`](crate::graph::ModelGraph), which keeps both
//! ends of an edge pair in step.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warpgen_core::naming::{self, or_derived};
use warpgen_core::{EngineResult, EntityId, RelationshipId, Validatable, validate_name};

use crate::attribute::Attribute;

// ============================================================================
// Entity
// ============================================================================

/// A named thing represented as a generated class family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity
    id: EntityId,

    /// Entity name (snake_case, e.g., "user", "blog_post")
    name: String,

    /// Attributes in declaration order
    attributes: Vec<Attribute>,

    /// Relationships declared by this entity
    relationships: Vec<RelationshipId>,

    /// Mirrored relationships declared by other entities that point here
    back_populates: Vec<RelationshipId>,

    /// Naming overrides
    pub config: EntityConfig,

    /// Generated endpoints for this entity require authentication
    pub secure: bool,
}

impl Entity {
    /// Create a new entity, validating its name
    pub fn new(name: impl Into<String>) -> EngineResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            attributes: Vec::new(),
            relationships: Vec::new(),
            back_populates: Vec::new(),
            config: EntityConfig::default(),
            secure: false,
        })
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Append attributes
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Set naming overrides
    pub fn with_config(mut self, config: EntityConfig) -> Self {
        self.config = config;
        self
    }

    /// Mark as requiring authentication
    pub fn secured(mut self) -> Self {
        self.secure = true;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Ids of owned relationships, in declaration order
    pub fn relationship_ids(&self) -> &[RelationshipId] {
        &self.relationships
    }

    /// Ids of inbound mirrored relationships, in registration order
    pub fn back_populates_ids(&self) -> &[RelationshipId] {
        &self.back_populates
    }

    /// Whether this entity holds the relationship on either side
    pub fn is_associated(&self, relationship: RelationshipId) -> bool {
        self.relationships.contains(&relationship) || self.back_populates.contains(&relationship)
    }

    // ========================================================================
    // Derived names
    // ========================================================================

    /// PascalCase class name
    pub fn class_name(&self) -> String {
        or_derived(self.config.class_name.as_deref(), || {
            naming::derive_class_name(&self.name)
        })
    }

    /// Plural form of the name
    pub fn plural(&self) -> String {
        or_derived(self.config.plural.as_deref(), || {
            naming::derive_plural(&self.name)
        })
    }

    /// Class name of the plural
    pub fn plural_class_name(&self) -> String {
        or_derived(self.config.plural_class_name.as_deref(), || {
            naming::derive_class_name(&self.plural())
        })
    }

    /// Database table name; falls back to the plural
    pub fn table_name(&self) -> String {
        or_derived(self.config.table_name.as_deref(), || self.plural())
    }

    /// URL route segment; the plural with hyphens
    pub fn route_name(&self) -> String {
        or_derived(self.config.route_name.as_deref(), || {
            naming::derive_route_name(&self.plural())
        })
    }

    // ========================================================================
    // Graph-only mutation
    // ========================================================================

    pub(crate) fn push_attributes(&mut self, attributes: impl IntoIterator<Item = Attribute>) {
        self.attributes.extend(attributes);
    }

    pub(crate) fn push_relationship(&mut self, id: RelationshipId) {
        self.relationships.push(id);
    }

    pub(crate) fn push_back_populates(&mut self, id: RelationshipId) {
        self.back_populates.push(id);
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Validatable for Entity {
    fn validate(&self) -> EngineResult<()> {
        validate_name(&self.name)?;
        for attribute in &self.attributes {
            validate_name(attribute.name())?;
        }
        Ok(())
    }
}

// ============================================================================
// Entity Configuration
// ============================================================================

/// Per-entity naming overrides
///
/// A set value replaces the derived name outright; it is not checked against
/// the snake_case grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub route_name: Option<String>,
    pub table_name: Option<String>,
    pub class_name: Option<String>,
    pub plural: Option<String>,
    pub plural_class_name: Option<String>,
}

impl EntityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route_name(mut self, route_name: impl Into<String>) -> Self {
        self.route_name = Some(route_name.into());
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn with_plural_class_name(mut self, plural_class_name: impl Into<String>) -> Self {
        self.plural_class_name = Some(plural_class_name.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
