//! Error types for Warpgen
//!
//! Every failure in the modeling core is a contract violation by the caller:
//! a badly formed name, an inconsistent relationship declaration, a query
//! against an edge the entity does not hold, or a module path too deep to
//! resolve. None of them are retried or recovered from inside the engine.

use thiserror::Error;

/// The main error type for Warpgen
#[derive(Debug, Error)]
pub enum EngineError {
    // ========================================================================
    // Contract Errors
    // ========================================================================
    /// An identifier does not follow the snake_case grammar
    #[error("Name '{name}' must follow the snake_case rule")]
    NameFormat { name: String },

    /// A relationship was declared with an inconsistent shape
    #[error("Relationship configuration error: {0}")]
    RelationshipConfiguration(String),

    /// A relationship query was issued against an entity that holds neither side of it
    #[error("Relationship '{relationship}' is not associated with entity '{entity}'")]
    UnassociatedRelationship { entity: String, relationship: String },

    /// The module path resolver exceeded its ascent bound
    #[error("Can't resolve modules nested more than 10 folders deep: '{from}' -> '{to}'")]
    PathDepth { from: String, to: String },

    /// A module path is empty or contains an empty segment
    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity validation failed
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Duplicate entity name
    #[error("Duplicate entity name: '{0}' already exists")]
    DuplicateEntity(String),

    /// Two members of one entity resolve to the same name
    #[error("Duplicate member name: '{member}' already exists in entity '{entity}'")]
    DuplicateMember { entity: String, member: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EngineError {
    /// Create a name-format error
    pub fn name_format(name: impl Into<String>) -> Self {
        EngineError::NameFormat { name: name.into() }
    }

    /// Create a relationship-configuration error
    pub fn relationship_configuration(msg: impl Into<String>) -> Self {
        EngineError::RelationshipConfiguration(msg.into())
    }

    /// Create an unassociated-relationship error
    pub fn unassociated(entity: impl Into<String>, relationship: impl Into<String>) -> Self {
        EngineError::UnassociatedRelationship {
            entity: entity.into(),
            relationship: relationship.into(),
        }
    }

    /// Create a path-depth error
    pub fn path_depth(from: impl Into<String>, to: impl Into<String>) -> Self {
        EngineError::PathDepth {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfig(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is one of the four caller contract violations
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EngineError::NameFormat { .. }
                | EngineError::RelationshipConfiguration(_)
                | EngineError::UnassociatedRelationship { .. }
                | EngineError::PathDepth { .. }
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::EntityValidation { .. }
                | EngineError::DuplicateEntity(_)
                | EngineError::DuplicateMember { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::EntityNotFound(_))
    }
}

/// Result type alias using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T>;
}

impl<T, E: Into<EngineError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EngineResult<T> {
        self.map_err(|e| {
            let err: EngineError = e.into();
            EngineError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_format_error() {
        let err = EngineError::name_format("BadName");
        assert!(err.is_contract_violation());
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "Name 'BadName' must follow the snake_case rule"
        );
    }

    #[test]
    fn test_relationship_errors() {
        let err = EngineError::relationship_configuration(
            "many_to_many relationship 'tags' must have a back-populates pair",
        );
        assert!(err.is_contract_violation());

        let err = EngineError::unassociated("user", "posts");
        assert!(err.is_contract_violation());
        assert_eq!(
            err.to_string(),
            "Relationship 'posts' is not associated with entity 'user'"
        );
    }

    #[test]
    fn test_path_depth_error() {
        let err = EngineError::path_depth("a/b", "x");
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("more than 10 folders deep"));
    }

    #[test]
    fn test_entity_validation_error() {
        let err = EngineError::entity_validation("order", "secure entity requires an auth entity");
        assert!(err.is_validation());
        assert!(!err.is_contract_violation());
        assert_eq!(
            err.to_string(),
            "Entity validation failed for 'order': secure entity requires an auth entity"
        );
    }

    #[test]
    fn test_duplicate_errors() {
        let err = EngineError::DuplicateEntity("user".to_string());
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Duplicate entity name: 'user' already exists"
        );

        let err = EngineError::DuplicateMember {
            entity: "user".to_string(),
            member: "email".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate member name: 'email' already exists in entity 'user'"
        );
    }

    #[test]
    fn test_not_found_error() {
        let err = EngineError::EntityNotFound("role".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_result_context() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = io.with_context("Reading layout").unwrap_err();
        assert_eq!(err.to_string(), "Reading layout: IO error: file not found");
    }
}
