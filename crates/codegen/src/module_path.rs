//! Relative module references
//!
//! Generated files import each other with relative references: one leading
//! dot for "this package", one more per parent, then the dotted path down to
//! the target module. Both locations are slash-separated, extension-less
//! paths from the same project root.

use tracing::trace;
use warpgen_core::{EngineError, EngineResult};

/// Ascent steps checked per search before giving up
pub const MAX_ASCENT: usize = 9;

/// Reference a file at `from_module` would use to import `to_module`
///
/// ```rust,ignore
/// assert_eq!(resolve_reference("m1/m2/m3", "m1/m2/m")?, ".m");
/// assert_eq!(resolve_reference("m1/m2/m3/m4/m5", "x/y")?, ".....x.y");
/// ```
pub fn resolve_reference(from_module: &str, to_module: &str) -> EngineResult<String> {
    let from = segments(from_module)?;
    let to = segments(to_module)?;

    let from_dir = &from[..from.len() - 1];
    let (to_file, to_dir) = match to.split_last() {
        Some((file, dir)) => (*file, dir),
        None => return Err(EngineError::InvalidModulePath(to_module.to_string())),
    };

    // Climb from the target's directory until it contains the source file.
    let mut common = to_dir;
    let mut descent = vec![to_file];
    let mut found = false;
    for _ in 0..MAX_ASCENT {
        if from.starts_with(common) {
            found = true;
            break;
        }
        let Some((last, parent)) = common.split_last() else {
            break;
        };
        trace!(passed = *last, "ascending from target");
        descent.push(*last);
        common = parent;
    }
    if !found {
        return Err(EngineError::path_depth(from_module, to_module));
    }
    if common.len() == from.len() {
        return Err(EngineError::InvalidModulePath(format!(
            "'{from_module}' is both a module and the package holding '{to_module}'"
        )));
    }

    // Climb from the source's directory up to the common ancestor.
    let mut position = from_dir;
    let mut ascents = None;
    for step in 0..MAX_ASCENT {
        if common.starts_with(position) {
            ascents = Some(step);
            break;
        }
        position = &position[..position.len() - 1];
    }
    let Some(ascents) = ascents else {
        return Err(EngineError::path_depth(from_module, to_module));
    };

    descent.reverse();
    let reference = format!("{}{}", ".".repeat(ascents + 1), descent.join("."));
    trace!(from = from_module, to = to_module, %reference, "resolved module reference");
    Ok(reference)
}

fn segments(path: &str) -> EngineResult<Vec<&str>> {
    let parts: Vec<&str> = path.split('/').collect();
    if path.is_empty() || parts.iter().any(|p| p.is_empty()) {
        return Err(EngineError::InvalidModulePath(path.to_string()));
    }
    Ok(parts)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("m1/m2/m3", "m1/m2/m", ".m")]
    #[case("m1/m2/m3/m4/m5", "x/y", ".....x.y")]
    #[case("app/models/user_model", "app/models/role_model", ".role_model")]
    #[case("app/routes/user_route", "app/schemas/user_schema", "..schemas.user_schema")]
    #[case("app/main", "app/routes/main_routes", ".routes.main_routes")]
    #[case("app/routes/main_routes", "app/database", "..database")]
    #[case("main", "app/database", ".app.database")]
    #[case("a/b", "a/b", ".b")]
    fn test_resolve_reference(#[case] from: &str, #[case] to: &str, #[case] expected: &str) {
        assert_eq!(resolve_reference(from, to).unwrap(), expected);
    }

    #[test]
    fn test_deepest_accepted_source() {
        assert_eq!(
            resolve_reference("m1/m2/m3/m4/m5/m6/m7/m8/m9", "x").unwrap(),
            ".........x"
        );
    }

    #[rstest]
    #[case("m1/m2/m3/m4/m5/m6/m7/m8/m9/m10", "x")]
    #[case("m1/m2/m3/m4/m5/m6/m7/m8/m9/m10/m11/m12", "x")]
    #[case("x", "m1/m2/m3/m4/m5/m6/m7/m8/m9/m10/m11/m12")]
    fn test_too_deep(#[case] from: &str, #[case] to: &str) {
        let err = resolve_reference(from, to).unwrap_err();
        assert!(matches!(err, EngineError::PathDepth { .. }));
        assert!(err.to_string().contains("more than 10 folders deep"));
    }

    #[rstest]
    #[case("", "a")]
    #[case("a", "")]
    #[case("a//b", "c")]
    #[case("a/b/", "c")]
    fn test_invalid_paths(#[case] from: &str, #[case] to: &str) {
        assert!(matches!(
            resolve_reference(from, to),
            Err(EngineError::InvalidModulePath(_))
        ));
    }

    #[test]
    fn test_module_that_is_also_a_package() {
        assert!(matches!(
            resolve_reference("a/b", "a/b/c"),
            Err(EngineError::InvalidModulePath(_))
        ));
    }

    #[test]
    fn test_segment_prefix_not_string_prefix() {
        // "m1/m" is not an ancestor of "m1/m2/x" even though it is a string prefix.
        assert_eq!(resolve_reference("m1/m2/x", "m1/m/y").unwrap(), "..m.y");
    }
}
