//! Core types used throughout Warpgen
//!
//! Identifier aliases, the semantic type tag carried by every attribute, and
//! the relationship cardinality enum shared by the model and the planners.

use serde::{Deserialize, Serialize};

// ============================================================================
// Unique Identifiers
// ============================================================================

/// Type alias for entity unique identifiers
pub type EntityId = uuid::Uuid;

/// Type alias for relationship unique identifiers
pub type RelationshipId = uuid::Uuid;

// ============================================================================
// Data Types
// ============================================================================

/// Semantic type tag for an attribute
///
/// A tag names the same value in three layers of the generated application:
/// the source-level type used by model structs, an optional type used by
/// request/response payloads when it differs from the source type, and the
/// column type used by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    /// Type name in generated model code
    pub source_type: String,
    /// Type name in generated payload shapes, when different from `source_type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_type: Option<String>,
    /// Column type name in the persistence layer
    pub persistence_type: String,
}

impl DataType {
    /// Create a type tag without a dedicated validation type
    pub fn new(source_type: impl Into<String>, persistence_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            validation_type: None,
            persistence_type: persistence_type.into(),
        }
    }

    /// Attach a validation-layer type name
    pub fn with_validation_type(mut self, validation_type: impl Into<String>) -> Self {
        self.validation_type = Some(validation_type.into());
        self
    }

    /// Type name to use in payload shapes
    pub fn payload_type(&self) -> &str {
        self.validation_type
            .as_deref()
            .unwrap_or(&self.source_type)
    }

    // ------------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------------

    pub fn int() -> Self {
        Self::new("i32", "Integer")
    }

    pub fn big_int() -> Self {
        Self::new("i64", "BigInteger")
    }

    pub fn string() -> Self {
        Self::new("String", "String")
    }

    pub fn text() -> Self {
        Self::new("String", "Text")
    }

    pub fn unicode() -> Self {
        Self::new("String", "Unicode")
    }

    pub fn float() -> Self {
        Self::new("f64", "Double")
    }

    pub fn decimal() -> Self {
        Self::new("rust_decimal::Decimal", "Decimal")
    }

    pub fn bool() -> Self {
        Self::new("bool", "Boolean")
    }

    pub fn date() -> Self {
        Self::new("chrono::NaiveDate", "Date")
    }

    pub fn date_time() -> Self {
        Self::new("chrono::DateTime<chrono::Utc>", "TimestampWithTimeZone")
    }

    pub fn time() -> Self {
        Self::new("chrono::NaiveTime", "Time")
    }

    pub fn interval() -> Self {
        Self::new("chrono::Duration", "Interval")
    }

    pub fn uuid() -> Self {
        Self::new("uuid::Uuid", "Uuid")
    }

    /// Email addresses are plain strings everywhere but in payloads
    pub fn email() -> Self {
        Self::new("String", "String").with_validation_type("email_address::EmailAddress")
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::string()
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.source_type, self.persistence_type)
    }
}

// ============================================================================
// Relationship Types
// ============================================================================

/// Cardinality of a relationship, as declared on its owning side
///
/// The same value is read from both ends of a mirrored pair: a `OneToMany`
/// edge is "many" when viewed from its owner and "one" when viewed from the
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// One record relates to exactly one other record
    OneToOne,
    /// One record relates to many others (e.g., user has many posts)
    #[default]
    OneToMany,
    /// Many records relate to one (inverse of OneToMany)
    ManyToOne,
    /// Many-to-many; only representable with a back-populated pair
    ManyToMany,
}

impl RelationType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "one_to_one",
            RelationType::OneToMany => "one_to_many",
            RelationType::ManyToOne => "many_to_one",
            RelationType::ManyToMany => "many_to_many",
        }
    }

    /// Get arrow symbol for visual representation
    pub fn arrow_symbol(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "1 ─── 1",
            RelationType::OneToMany => "1 ───< *",
            RelationType::ManyToOne => "* >─── 1",
            RelationType::ManyToMany => "* >──< *",
        }
    }

    /// Whether an edge of this type must carry a mirror
    pub fn requires_back_populates(&self) -> bool {
        matches!(self, RelationType::ManyToMany)
    }

    /// Whether the owning side holds a collection
    pub fn is_many_from_owner(&self) -> bool {
        matches!(self, RelationType::OneToMany | RelationType::ManyToMany)
    }

    /// Whether the target side holds a collection
    pub fn is_many_from_target(&self) -> bool {
        matches!(self, RelationType::ManyToOne | RelationType::ManyToMany)
    }

    /// Get all relationship types
    pub fn all() -> &'static [RelationType] {
        &[
            RelationType::OneToOne,
            RelationType::OneToMany,
            RelationType::ManyToOne,
            RelationType::ManyToMany,
        ]
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_type_prefers_validation_type() {
        assert_eq!(DataType::int().payload_type(), "i32");
        assert_eq!(
            DataType::email().payload_type(),
            "email_address::EmailAddress"
        );
        assert_eq!(DataType::email().source_type, "String");
    }

    #[test]
    fn test_only_email_preset_carries_validation_type() {
        let presets = [
            DataType::int(),
            DataType::big_int(),
            DataType::string(),
            DataType::text(),
            DataType::unicode(),
            DataType::float(),
            DataType::decimal(),
            DataType::bool(),
            DataType::date(),
            DataType::date_time(),
            DataType::time(),
            DataType::interval(),
            DataType::uuid(),
        ];
        assert!(presets.iter().all(|t| t.validation_type.is_none()));
        assert!(DataType::email().validation_type.is_some());
    }

    #[test]
    fn test_string_and_text_share_source_type() {
        assert_eq!(DataType::string().source_type, DataType::text().source_type);
        assert_ne!(DataType::string(), DataType::text());
    }

    #[test]
    fn test_relation_many_from_each_side() {
        assert!(RelationType::OneToMany.is_many_from_owner());
        assert!(!RelationType::OneToMany.is_many_from_target());
        assert!(!RelationType::ManyToOne.is_many_from_owner());
        assert!(RelationType::ManyToOne.is_many_from_target());
        assert!(RelationType::ManyToMany.is_many_from_owner());
        assert!(RelationType::ManyToMany.is_many_from_target());
        assert!(!RelationType::OneToOne.is_many_from_owner());
        assert!(!RelationType::OneToOne.is_many_from_target());
    }

    #[test]
    fn test_only_many_to_many_requires_back_populates() {
        let required: Vec<_> = RelationType::all()
            .iter()
            .filter(|r| r.requires_back_populates())
            .collect();
        assert_eq!(required, vec![&RelationType::ManyToMany]);
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(RelationType::ManyToOne.to_string(), "many_to_one");
    }
}
