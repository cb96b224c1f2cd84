//! Relationship graph
//!
//! `ModelGraph` owns every entity and every relationship of a model. Entities
//! live in an arena indexed by id; relationships live in an edge list. Adding
//! a relationship is the only way entity relationship lists change, and it
//! updates both ends in one step so an owned edge and its mirror can never
//! disagree.
//!
//! ## Viewing side
//!
//! A relationship answers differently depending on which entity asks. From
//! the owner it resolves to its own name and target; from the target of a
//! mirrored edge it resolves to the back-populates name and the owner. The
//! [`Edge`] view pins one relationship to one viewing side and answers every
//! cardinality question from there.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use warpgen_core::{
    EngineError, EngineResult, EntityId, RelationType, RelationshipId, Validatable, validate_name,
};

use crate::attribute::Attribute;
use crate::entity::Entity;
use crate::relationship::Relationship;

/// Member name every generated class reserves for its primary key
pub const ID_MEMBER: &str = "id";

// ============================================================================
// Model Graph
// ============================================================================

/// Arena of entities plus the edge list connecting them
///
/// Deserializing rebuilds the id indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GraphRecord")]
pub struct ModelGraph {
    /// Project name (snake_case)
    name: String,

    /// All entities, in insertion order
    entities: Vec<Entity>,

    /// Entity id to arena slot
    #[serde(skip)]
    entity_index: HashMap<EntityId, usize>,

    /// All relationships, in registration order
    relationships: Vec<Relationship>,

    /// Relationship id to edge slot
    #[serde(skip)]
    relationship_index: HashMap<RelationshipId, usize>,

    /// Entity used for authentication, if any
    auth_entity: Option<EntityId>,
}

/// Serialized form of a graph, without the indexes
#[derive(Deserialize)]
struct GraphRecord {
    name: String,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    auth_entity: Option<EntityId>,
}

impl From<GraphRecord> for ModelGraph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = Self {
            name: record.name,
            entities: record.entities,
            entity_index: HashMap::new(),
            relationships: record.relationships,
            relationship_index: HashMap::new(),
            auth_entity: record.auth_entity,
        };
        graph.reindex();
        graph
    }
}

impl ModelGraph {
    /// Create an empty graph for a project
    pub fn new(name: impl Into<String>) -> EngineResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            entities: Vec::new(),
            entity_index: HashMap::new(),
            relationships: Vec::new(),
            relationship_index: HashMap::new(),
            auth_entity: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rebuild the id indexes from the entity and edge lists
    pub fn reindex(&mut self) {
        self.entity_index = self
            .entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.id(), idx))
            .collect();
        self.relationship_index = self
            .relationships
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id(), idx))
            .collect();
    }

    // ========================================================================
    // Entity Operations
    // ========================================================================

    /// Add an entity; names are unique within a graph
    pub fn add_entity(&mut self, entity: Entity) -> EngineResult<EntityId> {
        if self.entity_by_name(entity.name()).is_some() {
            return Err(EngineError::DuplicateEntity(entity.name().to_string()));
        }
        let id = entity.id();
        debug!(entity = entity.name(), "registering entity");
        self.entity_index.insert(id, self.entities.len());
        self.entities.push(entity);
        Ok(id)
    }

    /// Get an entity by id
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entity_index.get(&id).map(|&idx| &self.entities[idx])
    }

    /// Get an entity by id, failing if it is not part of this graph
    pub fn entity(&self, id: EntityId) -> EngineResult<&Entity> {
        self.get_entity(id)
            .ok_or_else(|| EngineError::EntityNotFound(id.to_string()))
    }

    fn entity_mut(&mut self, id: EntityId) -> EngineResult<&mut Entity> {
        let idx = *self
            .entity_index
            .get(&id)
            .ok_or_else(|| EngineError::EntityNotFound(id.to_string()))?;
        Ok(&mut self.entities[idx])
    }

    /// Get an entity by name
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Iterate over all entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Append attributes to an entity
    pub fn add_attributes(
        &mut self,
        entity: EntityId,
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> EngineResult<()> {
        self.entity_mut(entity)?.push_attributes(attributes);
        Ok(())
    }

    /// Designate the authentication entity
    pub fn set_auth_entity(&mut self, entity: EntityId) -> EngineResult<()> {
        self.entity(entity)?;
        self.auth_entity = Some(entity);
        Ok(())
    }

    pub fn auth_entity(&self) -> Option<&Entity> {
        self.auth_entity.and_then(|id| self.get_entity(id))
    }

    // ========================================================================
    // Relationship Operations
    // ========================================================================

    /// Register a relationship owned by `source`
    ///
    /// The edge goes on the source's owned list and, when mirrored, on the
    /// target's inbound list. Everything is checked before either list is
    /// touched.
    pub fn add_relationship(
        &mut self,
        source: EntityId,
        relationship: Relationship,
    ) -> EngineResult<RelationshipId> {
        let source_name = self.entity(source)?.name().to_string();
        let target = relationship.related_object();
        self.entity(target)?;

        if self.relationship_index.contains_key(&relationship.id()) {
            return Err(EngineError::relationship_configuration(format!(
                "relationship '{}' is already registered",
                relationship.name()
            )));
        }
        if let Some(owner) = relationship.back_populates_object() {
            if owner != source {
                return Err(EngineError::relationship_configuration(format!(
                    "relationship '{}' back-populates an entity other than its owner '{}'",
                    relationship.name(),
                    source_name
                )));
            }
        }

        let id = relationship.id();
        let mirrored = relationship.is_back_populated();
        debug!(
            source = %source_name,
            relationship = relationship.name(),
            kind = %relationship.relationship_type(),
            mirrored,
            "registering relationship"
        );

        self.entity_mut(source)?.push_relationship(id);
        if mirrored {
            self.entity_mut(target)?.push_back_populates(id);
        }
        self.relationship_index.insert(id, self.relationships.len());
        self.relationships.push(relationship);
        Ok(id)
    }

    /// Build and register a relationship in one call
    ///
    /// With a back-populates name the edge is mirrored onto `target`, with
    /// `source` as the mirror object.
    pub fn relate(
        &mut self,
        source: EntityId,
        target: EntityId,
        relationship_type: RelationType,
        name: &str,
        back_populates_name: Option<&str>,
        optional: bool,
    ) -> EngineResult<RelationshipId> {
        let relationship = Relationship::create(
            name,
            target,
            relationship_type,
            back_populates_name.map(str::to_string),
            back_populates_name.map(|_| source),
            optional,
        )?;
        self.add_relationship(source, relationship)
    }

    pub fn add_one_to_one(
        &mut self,
        source: EntityId,
        target: EntityId,
        name: &str,
        back_populates_name: Option<&str>,
        optional: bool,
    ) -> EngineResult<RelationshipId> {
        self.relate(source, target, RelationType::OneToOne, name, back_populates_name, optional)
    }

    pub fn add_one_to_many(
        &mut self,
        source: EntityId,
        target: EntityId,
        name: &str,
        back_populates_name: Option<&str>,
        optional: bool,
    ) -> EngineResult<RelationshipId> {
        self.relate(source, target, RelationType::OneToMany, name, back_populates_name, optional)
    }

    pub fn add_many_to_one(
        &mut self,
        source: EntityId,
        target: EntityId,
        name: &str,
        back_populates_name: Option<&str>,
        optional: bool,
    ) -> EngineResult<RelationshipId> {
        self.relate(source, target, RelationType::ManyToOne, name, back_populates_name, optional)
    }

    pub fn add_many_to_many(
        &mut self,
        source: EntityId,
        target: EntityId,
        name: &str,
        back_populates_name: &str,
        optional: bool,
    ) -> EngineResult<RelationshipId> {
        self.relate(
            source,
            target,
            RelationType::ManyToMany,
            name,
            Some(back_populates_name),
            optional,
        )
    }

    /// Get a relationship by id
    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationship_index
            .get(&id)
            .map(|&idx| &self.relationships[idx])
    }

    /// Iterate over all relationships in registration order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Relationships owned by an entity
    pub fn owned_relationships(&self, entity: EntityId) -> EngineResult<Vec<&Relationship>> {
        let entity = self.entity(entity)?;
        Ok(self.lookup(entity.relationship_ids()))
    }

    /// Mirrored relationships pointing at an entity
    pub fn inbound_relationships(&self, entity: EntityId) -> EngineResult<Vec<&Relationship>> {
        let entity = self.entity(entity)?;
        Ok(self.lookup(entity.back_populates_ids()))
    }

    /// Owned relationships followed by inbound ones
    pub fn all_relationships(&self, entity: EntityId) -> EngineResult<Vec<&Relationship>> {
        let mut all = self.owned_relationships(entity)?;
        all.extend(self.inbound_relationships(entity)?);
        Ok(all)
    }

    fn lookup(&self, ids: &[RelationshipId]) -> Vec<&Relationship> {
        ids.iter().filter_map(|id| self.relationship(*id)).collect()
    }

    // ========================================================================
    // Edge Views
    // ========================================================================

    /// View a relationship from an entity
    ///
    /// A mirrored self-relationship sits on both lists of the same entity;
    /// this resolves it as inbound. Use [`edges`](Self::edges) to see both
    /// halves.
    pub fn edge<'g>(&'g self, ctx: EntityId, relationship: &'g Relationship) -> EngineResult<Edge<'g>> {
        let entity = self.entity(ctx)?;
        if !entity.is_associated(relationship.id()) {
            return Err(EngineError::unassociated(entity.name(), relationship.name()));
        }
        let side = if entity.back_populates_ids().contains(&relationship.id()) {
            EdgeSide::Inbound
        } else {
            EdgeSide::Owned
        };
        Edge::resolve(self, entity, relationship, side)
    }

    /// Every edge of an entity, owned first, each pinned to its side
    pub fn edges(&self, ctx: EntityId) -> EngineResult<Vec<Edge<'_>>> {
        let entity = self.entity(ctx)?;
        let owned = self
            .lookup(entity.relationship_ids())
            .into_iter()
            .map(|rel| Edge::resolve(self, entity, rel, EdgeSide::Owned));
        let inbound = self
            .lookup(entity.back_populates_ids())
            .into_iter()
            .map(|rel| Edge::resolve(self, entity, rel, EdgeSide::Inbound));
        owned.chain(inbound).collect()
    }

    // ========================================================================
    // Cardinality Queries
    // ========================================================================

    /// Whether `rel` is held on `ctx`'s inbound list
    pub fn is_backref(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<bool> {
        Ok(self.edge(ctx, rel)?.is_backref())
    }

    /// Member name of `rel` on `ctx`
    pub fn resolved_name(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<String> {
        Ok(self.edge(ctx, rel)?.name().to_string())
    }

    /// Member name of the counterpart on the other end, for mirrored edges
    pub fn back_populates_name(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<Option<String>> {
        Ok(self.edge(ctx, rel)?.back_populates_name().map(str::to_string))
    }

    /// The entity on the other end of `rel`, as seen from `ctx`
    pub fn resolved_target<'g>(&'g self, ctx: EntityId, rel: &'g Relationship) -> EngineResult<&'g Entity> {
        Ok(self.edge(ctx, rel)?.target())
    }

    /// Whether `ctx` holds a collection through `rel`
    pub fn is_many(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<bool> {
        Ok(self.edge(ctx, rel)?.is_many())
    }

    /// Whether `rel` points from `ctx` back to an entity of the same name
    pub fn is_self(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<bool> {
        Ok(self.edge(ctx, rel)?.is_self())
    }

    /// Whether another edge on the same side of `ctx` reaches the same target
    pub fn is_parallel(&self, ctx: EntityId, rel: &Relationship) -> EngineResult<bool> {
        Ok(self.edge(ctx, rel)?.is_parallel())
    }
}

impl Validatable for ModelGraph {
    fn validate(&self) -> EngineResult<()> {
        validate_name(&self.name)?;
        for entity in &self.entities {
            entity.validate()?;

            let edges = self.edges(entity.id())?;
            let mut members = vec![ID_MEMBER];
            let names = entity
                .attributes()
                .iter()
                .map(|a| a.name())
                .chain(edges.iter().map(|e| e.name()));
            for name in names {
                if members.contains(&name) {
                    return Err(EngineError::DuplicateMember {
                        entity: entity.name().to_string(),
                        member: name.to_string(),
                    });
                }
                members.push(name);
            }

            if entity.secure && self.auth_entity().is_none() {
                return Err(EngineError::entity_validation(
                    entity.name(),
                    "secure entity requires an auth entity",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Edge View
// ============================================================================

/// Which list of the viewing entity holds the relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    /// Declared by the viewing entity
    Owned,
    /// Mirrored onto the viewing entity by its owner
    Inbound,
}

/// A relationship seen from one side
#[derive(Debug, Clone, Copy)]
pub struct Edge<'g> {
    graph: &'g ModelGraph,
    ctx: &'g Entity,
    relationship: &'g Relationship,
    side: EdgeSide,
    target: &'g Entity,
}

impl<'g> Edge<'g> {
    fn resolve(
        graph: &'g ModelGraph,
        ctx: &'g Entity,
        relationship: &'g Relationship,
        side: EdgeSide,
    ) -> EngineResult<Self> {
        let target = graph.entity(Self::target_id(relationship, side))?;
        Ok(Self {
            graph,
            ctx,
            relationship,
            side,
            target,
        })
    }

    fn target_id(relationship: &Relationship, side: EdgeSide) -> EntityId {
        match side {
            EdgeSide::Owned => relationship.related_object(),
            EdgeSide::Inbound => relationship
                .back_populates_object()
                .unwrap_or_else(|| relationship.related_object()),
        }
    }

    pub fn relationship(&self) -> &'g Relationship {
        self.relationship
    }

    /// The viewing entity
    pub fn context(&self) -> &'g Entity {
        self.ctx
    }

    pub fn side(&self) -> EdgeSide {
        self.side
    }

    pub fn is_backref(&self) -> bool {
        self.side == EdgeSide::Inbound
    }

    /// Member name on the viewing entity
    pub fn name(&self) -> &'g str {
        match self.side {
            EdgeSide::Owned => self.relationship.name(),
            EdgeSide::Inbound => self
                .relationship
                .back_populates_name()
                .unwrap_or_else(|| self.relationship.name()),
        }
    }

    /// Member name on the other end, when the edge is mirrored
    pub fn back_populates_name(&self) -> Option<&'g str> {
        match self.side {
            EdgeSide::Owned => self.relationship.back_populates_name(),
            EdgeSide::Inbound => Some(self.relationship.name()),
        }
    }

    /// The entity on the other end
    pub fn target(&self) -> &'g Entity {
        self.target
    }

    /// Whether the viewing entity holds a collection
    pub fn is_many(&self) -> bool {
        let kind = self.relationship.relationship_type();
        match self.side {
            EdgeSide::Owned => kind.is_many_from_owner(),
            EdgeSide::Inbound => kind.is_many_from_target(),
        }
    }

    /// Compared by name; names are unique within one graph
    pub fn is_self(&self) -> bool {
        self.ctx.name() == self.target.name()
    }

    /// Whether another edge on the same side reaches a target of the same name
    pub fn is_parallel(&self) -> bool {
        let ids = match self.side {
            EdgeSide::Owned => self.ctx.relationship_ids(),
            EdgeSide::Inbound => self.ctx.back_populates_ids(),
        };
        let target_name = self.target.name();
        let count = self
            .graph
            .lookup(ids)
            .into_iter()
            .filter_map(|rel| self.graph.get_entity(Self::target_id(rel, self.side)))
            .filter(|target| target.name() == target_name)
            .count();
        count > 1
    }
}

// ============================================================================
// Tests
// ============================================================================
