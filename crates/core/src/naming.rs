//! Naming rules
//!
//! Entity, attribute and relationship names are snake_case identifiers. Every
//! other name the generator writes (class names, plurals, table and route
//! names) is derived from them here. Each derivation has an override hook:
//! a configured value wins outright and is not re-validated.

use std::sync::LazyLock;

use heck::ToPascalCase;
use regex::Regex;

use crate::error::{EngineError, EngineResult};

/// Lowercase letters and digits, words separated by single underscores,
/// first character a letter.
static SNAKE_CASE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z\d]*(_[a-z\d]+)*$"));

/// Letters that keep a trailing `h` pronounced on its own ("month", "graph")
const SOFT_H_PRECEDERS: &str = "aeioudgkprt";

const VOWELS: &str = "aeiou";

/// Check a name against the snake_case grammar
pub fn is_snake_case(name: &str) -> bool {
    SNAKE_CASE.as_ref().is_ok_and(|re| re.is_match(name))
}

/// Validate a name, returning it unchanged on success
pub fn validate_name(name: &str) -> EngineResult<&str> {
    if is_snake_case(name) {
        Ok(name)
    } else {
        Err(EngineError::name_format(name))
    }
}

/// English plural of a snake_case name
///
/// - ends in `s`, `x` or `z`, or in `h` after a sibilant-forming letter: `+es`
/// - ends in consonant + `y`: `y` becomes `ies`
/// - anything else: `+s`
pub fn derive_plural(name: &str) -> String {
    let mut chars = name.chars().rev();
    let last = chars.next();
    let before_last = chars.next();

    match (before_last, last) {
        (_, Some('s' | 'x' | 'z')) => format!("{name}es"),
        (Some(prev), Some('h')) if !SOFT_H_PRECEDERS.contains(prev) => format!("{name}es"),
        (Some(prev), Some('y')) if !VOWELS.contains(prev) => {
            format!("{}ies", &name[..name.len() - 1])
        }
        _ => format!("{name}s"),
    }
}

/// PascalCase class name: split on `_`, capitalize each segment, concatenate
pub fn derive_class_name(name: &str) -> String {
    name.to_pascal_case()
}

/// Route segment for a plural: underscores become hyphens
pub fn derive_route_name(plural: &str) -> String {
    plural.replace('_', "-")
}

/// Apply an override hook: a configured value wins over the computed one
pub fn or_derived(configured: Option<&str>, derive: impl FnOnce() -> String) -> String {
    match configured {
        Some(value) => value.to_string(),
        None => derive(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user")]
    #[case("some_name")]
    #[case("item2")]
    #[case("a1_b2_c3")]
    #[case("x")]
    fn test_valid_names(#[case] name: &str) {
        assert!(is_snake_case(name));
        assert_eq!(validate_name(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case("User")]
    #[case("someName")]
    #[case("_private")]
    #[case("trailing_")]
    #[case("double__underscore")]
    #[case("1st_place")]
    #[case("with space")]
    #[case("kebab-case")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(!is_snake_case(name));
        let err = validate_name(name).unwrap_err();
        assert!(matches!(err, EngineError::NameFormat { .. }));
    }

    #[rstest]
    #[case("user", "users")]
    #[case("class", "classes")]
    #[case("big_class", "big_classes")]
    #[case("box", "boxes")]
    #[case("quiz", "quizes")]
    #[case("church", "churches")]
    #[case("dish", "dishes")]
    #[case("month", "months")]
    #[case("graph", "graphs")]
    #[case("city", "cities")]
    #[case("nice_city", "nice_cities")]
    #[case("day", "days")]
    #[case("y", "ys")]
    #[case("h", "hs")]
    fn test_derive_plural(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(derive_plural(name), expected);
    }

    #[rstest]
    #[case("user", "User")]
    #[case("some_name", "SomeName")]
    #[case("some_names", "SomeNames")]
    #[case("big_class", "BigClass")]
    #[case("item_2b", "Item2b")]
    fn test_derive_class_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(derive_class_name(name), expected);
    }

    #[test]
    fn test_class_name_has_no_underscores() {
        for name in ["a_b_c", "big_class", "nice_city"] {
            let class_name = derive_class_name(name);
            assert!(!class_name.contains('_'));
            assert_eq!(derive_class_name(&class_name), class_name);
        }
    }

    #[test]
    fn test_derive_route_name() {
        assert_eq!(derive_route_name("some_names"), "some-names");
        assert_eq!(derive_route_name("users"), "users");
    }

    #[test]
    fn test_override_wins_without_validation() {
        assert_eq!(or_derived(Some("Not Snake"), || "computed".into()), "Not Snake");
        assert_eq!(or_derived(None, || "computed".into()), "computed");
    }
}
