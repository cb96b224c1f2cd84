//! Relationship definitions between entities
//!
//! A single edge type covers both shapes a relationship can take: a plain
//! edge known only to its owner, and a mirrored edge that also appears in
//! the target entity's inbound list. The mirror is an optional payload
//! rather than a separate type because every query only needs to know
//! whether it is present.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warpgen_core::{EngineError, EngineResult, EntityId, RelationType, RelationshipId, validate_name};

// ============================================================================
// Relationship
// ============================================================================

/// A typed edge from an owning entity to a related entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier for this relationship
    id: RelationshipId,

    /// Member name on the owning entity
    name: String,

    /// Target entity
    related_object: EntityId,

    /// Cardinality as declared by the owner
    relationship_type: RelationType,

    /// The reference may be absent
    optional: bool,

    /// Counterpart member on the target, for mirrored edges
    mirror: Option<BackPopulates>,
}

/// The mirrored half of an edge pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackPopulates {
    /// Member name on the related entity
    pub name: String,
    /// The owning entity
    pub object: EntityId,
}

impl BackPopulates {
    pub fn new(name: impl Into<String>, object: EntityId) -> Self {
        Self {
            name: name.into(),
            object,
        }
    }
}

impl Relationship {
    /// Create a plain edge; many_to_many is rejected
    pub fn new(
        name: impl Into<String>,
        related_object: EntityId,
        relationship_type: RelationType,
        optional: bool,
    ) -> EngineResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        if relationship_type.requires_back_populates() {
            return Err(EngineError::relationship_configuration(format!(
                "relationship '{name}' of type {relationship_type} must have a back-populates pair"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            related_object,
            relationship_type,
            optional,
            mirror: None,
        })
    }

    /// Create a mirrored edge
    pub fn back_populated(
        name: impl Into<String>,
        related_object: EntityId,
        relationship_type: RelationType,
        mirror: BackPopulates,
        optional: bool,
    ) -> EngineResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_name(&mirror.name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            related_object,
            relationship_type,
            optional,
            mirror: Some(mirror),
        })
    }

    /// Create either shape from loose parts
    ///
    /// Both halves of the mirror must be given together; with neither, a
    /// plain edge is built.
    pub fn create(
        name: impl Into<String>,
        related_object: EntityId,
        relationship_type: RelationType,
        back_populates_name: Option<String>,
        back_populates_object: Option<EntityId>,
        optional: bool,
    ) -> EngineResult<Self> {
        match (back_populates_name, back_populates_object) {
            (Some(back_name), Some(object)) => Self::back_populated(
                name,
                related_object,
                relationship_type,
                BackPopulates::new(back_name, object),
                optional,
            ),
            (None, None) => Self::new(name, related_object, relationship_type, optional),
            _ => Err(EngineError::relationship_configuration(
                "both back-populates object and back-populates name need to be provided",
            )),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> RelationshipId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn related_object(&self) -> EntityId {
        self.related_object
    }

    pub fn relationship_type(&self) -> RelationType {
        self.relationship_type
    }

    pub fn optional(&self) -> bool {
        self.optional
    }

    pub fn mirror(&self) -> Option<&BackPopulates> {
        self.mirror.as_ref()
    }

    /// Whether the edge is registered on both ends
    pub fn is_back_populated(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn back_populates_name(&self) -> Option<&str> {
        self.mirror.as_ref().map(|m| m.name.as_str())
    }

    pub fn back_populates_object(&self) -> Option<EntityId> {
        self.mirror.as_ref().map(|m| m.object)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.mirror {
            Some(mirror) => write!(
                f,
                "{} {} ({})",
                self.name,
                self.relationship_type.arrow_symbol(),
                mirror.name
            ),
            None => write!(f, "{} {}", self.name, self.relationship_type.arrow_symbol()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_plain_relationship() {
        let target = Uuid::new_v4();
        let rel = Relationship::new("author", target, RelationType::ManyToOne, true).unwrap();
        assert_eq!(rel.name(), "author");
        assert_eq!(rel.related_object(), target);
        assert!(rel.optional());
        assert!(!rel.is_back_populated());
        assert_eq!(rel.back_populates_name(), None);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_plain_many_to_many_rejected(#[case] self_target: bool) {
        let owner = Uuid::new_v4();
        let target = if self_target { owner } else { Uuid::new_v4() };
        let err = Relationship::new("tags", target, RelationType::ManyToMany, false).unwrap_err();
        assert!(matches!(err, EngineError::RelationshipConfiguration(_)));

        let err = Relationship::create("tags", target, RelationType::ManyToMany, None, None, false)
            .unwrap_err();
        assert!(matches!(err, EngineError::RelationshipConfiguration(_)));
    }

    #[test]
    fn test_mirrored_many_to_many_allowed() {
        let owner = Uuid::new_v4();
        let rel = Relationship::back_populated(
            "tags",
            Uuid::new_v4(),
            RelationType::ManyToMany,
            BackPopulates::new("posts", owner),
            false,
        )
        .unwrap();
        assert!(rel.is_back_populated());
        assert_eq!(rel.back_populates_name(), Some("posts"));
        assert_eq!(rel.back_populates_object(), Some(owner));
    }

    #[test]
    fn test_create_requires_both_mirror_parts() {
        let target = Uuid::new_v4();
        let err = Relationship::create(
            "owner",
            target,
            RelationType::OneToOne,
            Some("pet".into()),
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::RelationshipConfiguration(_)));

        let err = Relationship::create("owner", target, RelationType::OneToOne, None, Some(target), false)
            .unwrap_err();
        assert!(matches!(err, EngineError::RelationshipConfiguration(_)));
    }

    #[test]
    fn test_names_are_validated() {
        let target = Uuid::new_v4();
        assert!(matches!(
            Relationship::new("Author", target, RelationType::ManyToOne, false),
            Err(EngineError::NameFormat { .. })
        ));
        assert!(matches!(
            Relationship::back_populated(
                "author",
                target,
                RelationType::ManyToOne,
                BackPopulates::new("Books", target),
                false,
            ),
            Err(EngineError::NameFormat { .. })
        ));
    }

    #[test]
    fn test_display() {
        let rel = Relationship::new("author", Uuid::new_v4(), RelationType::ManyToOne, false).unwrap();
        assert_eq!(rel.to_string(), "author * >─── 1");
    }
}
