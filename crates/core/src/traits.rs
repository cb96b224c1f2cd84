//! Core traits for Warpgen

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can check their own consistency
///
/// Construction already rejects malformed names and relationship shapes;
/// `validate` covers the rules that only make sense once a whole model has
/// been assembled (member name collisions, auth requirements, layout sanity).
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or the first problem found.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    struct Folder(&'static str);

    impl Validatable for Folder {
        fn validate(&self) -> EngineResult<()> {
            if self.0.is_empty() {
                return Err(EngineError::validation("folder name cannot be empty"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_methods() {
        assert!(Folder("models").is_valid());
        assert!(Folder("models").validation_errors().is_empty());

        let empty = Folder("");
        assert!(!empty.is_valid());
        assert_eq!(
            empty.validation_errors(),
            vec!["Validation error: folder name cannot be empty".to_string()]
        );
    }
}
