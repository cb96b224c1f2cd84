//! Built-in entities
//!
//! Ready-made entities most generated applications start from.

use warpgen_core::{EngineResult, EntityId};

use crate::attribute::{Attribute, DefaultValue};
use crate::entity::Entity;
use crate::graph::ModelGraph;

/// `role` with a `name` defaulting to `"user"`
pub fn role() -> EngineResult<Entity> {
    Ok(Entity::new("role")?.with_attributes([
        Attribute::name_field().with_default(DefaultValue::String("user".to_string()))
    ]))
}

/// `tag` with a unique name and a description
pub fn tag() -> EngineResult<Entity> {
    Ok(Entity::new("tag")?.with_attributes([Attribute::name_field().unique(), Attribute::description()]))
}

/// `user` with only login fields
pub fn basic_user() -> EngineResult<Entity> {
    Ok(Entity::new("user")?.with_attributes([Attribute::username(), Attribute::string("password")?]))
}

/// `user` with login fields, first and last name and email
pub fn user() -> EngineResult<Entity> {
    Ok(Entity::new("user")?.with_attributes([
        Attribute::username(),
        Attribute::string("password")?,
        Attribute::string("first_name")?,
        Attribute::string("last_name")?,
        Attribute::email(),
    ]))
}

/// Add `user` and `role` to a graph, link each user to one role, and make
/// the user the auth entity
pub fn install_user_with_role(graph: &mut ModelGraph) -> EngineResult<(EntityId, EntityId)> {
    let user = graph.add_entity(user()?)?;
    let role = graph.add_entity(role()?)?;
    graph.add_many_to_one(user, role, "role", Some("users"), false)?;
    graph.set_auth_entity(user)?;
    Ok((user, role))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warpgen_core::Validatable;

    #[test]
    fn test_install_user_with_role() {
        let mut graph = ModelGraph::new("blog").unwrap();
        let (user, role) = install_user_with_role(&mut graph).unwrap();

        assert_eq!(graph.auth_entity().map(|e| e.id()), Some(user));
        let edges = graph.edges(role).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].name(), "users");
        assert!(edges[0].is_many());
        assert!(graph.is_valid());
    }

    #[test]
    fn test_presets_are_valid_entities() {
        for entity in [role().unwrap(), tag().unwrap(), basic_user().unwrap(), user().unwrap()] {
            assert!(entity.is_valid());
            assert!(!entity.attributes().is_empty());
        }
    }

    #[test]
    fn test_preset_fields() {
        let names = |entity: Entity| -> Vec<String> {
            entity.attributes().iter().map(|a| a.name().to_string()).collect()
        };
        assert_eq!(names(basic_user().unwrap()), vec!["username", "password"]);
        assert_eq!(
            names(user().unwrap()),
            vec!["username", "password", "first_name", "last_name", "email"]
        );
        assert_eq!(names(tag().unwrap()), vec!["name", "description"]);

        let role = role().unwrap();
        assert_eq!(names(role.clone()), vec!["name"]);
        assert_eq!(
            role.attributes()[0].default,
            Some(DefaultValue::String("user".to_string()))
        );
    }

    #[test]
    fn test_secure_entity_with_installed_auth() {
        let mut graph = ModelGraph::new("blog").unwrap();
        install_user_with_role(&mut graph).unwrap();
        graph.add_entity(tag().unwrap().secured()).unwrap();
        assert!(graph.is_valid());
    }
}
