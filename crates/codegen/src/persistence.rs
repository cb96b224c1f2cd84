//! Persistence planning
//!
//! Turns one entity and its edges into the pieces of a persisted model
//! class: plain columns, foreign-key columns for single-valued edges,
//! reference members for every edge, and association tables for mirrored
//! many-to-many relationships.

use serde::Serialize;
use tracing::{debug, info};
use warpgen_core::{EngineResult, EntityId, RelationType};
use warpgen_ir::{Attribute, Edge, Entity, ModelGraph, ID_MEMBER};

use crate::layout::{FileKind, LayoutConfig};

// ============================================================================
// Plan Types
// ============================================================================

/// Delete behavior of a reference member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cascade {
    /// Delete related rows with the owner
    Delete,
    /// Also delete related rows once detached
    DeleteOrphan,
}

impl Cascade {
    pub fn display_name(&self) -> &'static str {
        match self {
            Cascade::Delete => "all, delete",
            Cascade::DeleteOrphan => "all, delete-orphan",
        }
    }
}

/// A column backed by an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPlan {
    pub name: String,
    pub persistence_type: String,
    pub source_type: String,
    pub default: Option<String>,
    pub unique: bool,
    pub nullable: bool,
}

impl ColumnPlan {
    fn from_attribute(attribute: &Attribute) -> Self {
        Self {
            name: attribute.name().to_string(),
            persistence_type: attribute.data_type.persistence_type.clone(),
            source_type: attribute.data_type.source_type.clone(),
            default: attribute.default.as_ref().map(|d| d.to_literal()),
            unique: attribute.unique,
            nullable: attribute.optional,
        }
    }
}

/// An integer column pointing at another table's primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyPlan {
    /// `<member>_id`
    pub column: String,
    pub target_table: String,
    pub nullable: bool,
    /// One row per target, for one-to-one edges
    pub unique: bool,
}

impl ForeignKeyPlan {
    /// `<table>.id` the column references
    pub fn target(&self) -> String {
        format!("{}.{}", self.target_table, ID_MEMBER)
    }
}

/// A relationship member of the model class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencePlan {
    pub name: String,
    pub target_class: String,
    /// Reference to the target's model module
    pub target_import: String,
    /// Holds a collection of targets
    pub many: bool,
    /// Member on the other end, for mirrored edges
    pub back_populates: Option<String>,
    /// Association table joining a many-to-many pair
    pub association_table: Option<String>,
    pub cascade: Option<Cascade>,
    /// Column that disambiguates parallel edges
    pub foreign_key: Option<String>,
    /// The primary key is the remote side of a self-reference
    pub remote_side: bool,
    /// Read-only `<member>_id` list accessor on collection members
    pub id_accessor: Option<String>,
}

/// One column of an association table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationColumn {
    pub name: String,
    pub target_table: String,
}

/// Join table of a many-to-many relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationTable {
    /// Name the table is declared under
    pub variable: String,
    pub table_name: String,
    pub columns: [AssociationColumn; 2],
}

/// Association table declared in another model module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationImport {
    pub import: String,
    pub variable: String,
}

/// Everything the model module of one entity declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistencePlan {
    pub entity: String,
    pub class_name: String,
    pub table_name: String,
    /// Reference to the module declaring the shared model base
    pub database_import: String,
    pub columns: Vec<ColumnPlan>,
    pub foreign_keys: Vec<ForeignKeyPlan>,
    pub references: Vec<ReferencePlan>,
    /// Tables this module declares
    pub association_tables: Vec<AssociationTable>,
    /// Tables this module uses but another declares
    pub association_imports: Vec<AssociationImport>,
}

impl PersistencePlan {
    pub fn reference(&self, name: &str) -> Option<&ReferencePlan> {
        self.references.iter().find(|r| r.name == name)
    }

    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKeyPlan> {
        self.foreign_keys.iter().find(|f| f.column == column)
    }
}

// ============================================================================
// Planning
// ============================================================================

/// Plan the model class of an entity
pub fn plan_persistence(
    graph: &ModelGraph,
    entity: EntityId,
    layout: &LayoutConfig,
) -> EngineResult<PersistencePlan> {
    let ctx = graph.entity(entity)?;
    let model_path = layout.module_path(FileKind::Model, ctx);

    let mut plan = PersistencePlan {
        entity: ctx.name().to_string(),
        class_name: layout.model_class(ctx),
        table_name: ctx.table_name(),
        database_import: layout.import_reference(&model_path, &layout.database_path())?,
        columns: ctx.attributes().iter().map(ColumnPlan::from_attribute).collect(),
        foreign_keys: Vec::new(),
        references: Vec::new(),
        association_tables: Vec::new(),
        association_imports: Vec::new(),
    };

    for edge in graph.edges(entity)? {
        let target = edge.target();
        let target_import = layout.entity_import(FileKind::Model, ctx, FileKind::Model, target)?;
        let many = edge.is_many();
        let mut association_table = None;

        if edge.relationship().relationship_type() == RelationType::ManyToMany {
            if let Some(table) = association(graph, &edge)? {
                if edge.is_backref() && target.name() != ctx.name() {
                    plan.association_imports.push(AssociationImport {
                        import: target_import.clone(),
                        variable: table.variable.clone(),
                    });
                }
                association_table = Some(table.variable.clone());
                if !edge.is_backref() {
                    plan.association_tables.push(table);
                }
            }
        }

        if !many {
            plan.foreign_keys.push(ForeignKeyPlan {
                column: format!("{}_id", edge.name()),
                target_table: target.table_name(),
                nullable: edge.relationship().optional(),
                unique: edge.relationship().relationship_type() == RelationType::OneToOne,
            });
        }

        debug!(
            entity = ctx.name(),
            member = edge.name(),
            target = target.name(),
            many,
            backref = edge.is_backref(),
            "planned reference"
        );
        plan.references.push(ReferencePlan {
            name: edge.name().to_string(),
            target_class: target.class_name(),
            target_import,
            many,
            back_populates: edge.back_populates_name().map(str::to_string),
            association_table,
            cascade: cascade(&edge),
            foreign_key: edge.is_parallel().then(|| format!("{}_id", edge.name())),
            remote_side: edge.is_self() && !edge.is_backref(),
            id_accessor: many.then(|| format!("{}_id", edge.name())),
        });
    }

    info!(
        entity = ctx.name(),
        columns = plan.columns.len(),
        foreign_keys = plan.foreign_keys.len(),
        references = plan.references.len(),
        association_tables = plan.association_tables.len(),
        "planned persistence"
    );
    Ok(plan)
}

/// Cascade for mirrored, required collection members
fn cascade(edge: &Edge<'_>) -> Option<Cascade> {
    let relationship = edge.relationship();
    if !relationship.is_back_populated() || !edge.is_many() || relationship.optional() {
        return None;
    }
    if relationship.relationship_type() == RelationType::ManyToMany {
        (!edge.is_backref()).then_some(Cascade::Delete)
    } else {
        Some(Cascade::DeleteOrphan)
    }
}

/// Join table of a mirrored many-to-many edge, named after its target then owner
fn association(graph: &ModelGraph, edge: &Edge<'_>) -> EngineResult<Option<AssociationTable>> {
    let relationship = edge.relationship();
    let Some(owner) = relationship.back_populates_object() else {
        return Ok(None);
    };
    let related: &Entity = graph.entity(relationship.related_object())?;
    let owner: &Entity = graph.entity(owner)?;
    Ok(Some(AssociationTable {
        variable: format!("{}_{}_association", related.name(), owner.name()),
        table_name: format!("{}_{}", related.name(), owner.name()),
        columns: [
            AssociationColumn {
                name: format!("{}_id", related.name()),
                target_table: related.table_name(),
            },
            AssociationColumn {
                name: format!("{}_id", owner.name()),
                target_table: owner.table_name(),
            },
        ],
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use warpgen_ir::{DefaultValue, EntityConfig};

    fn graph_with(names: &[&str]) -> (ModelGraph, Vec<EntityId>) {
        let mut graph = ModelGraph::new("test_app").unwrap();
        let ids = names
            .iter()
            .map(|n| graph.add_entity(Entity::new(*n).unwrap()).unwrap())
            .collect();
        (graph, ids)
    }

    fn plan(graph: &ModelGraph, entity: EntityId) -> PersistencePlan {
        plan_persistence(graph, entity, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_columns_from_attributes() {
        let mut graph = ModelGraph::new("shop").unwrap();
        let product = graph
            .add_entity(
                Entity::new("product")
                    .unwrap()
                    .with_config(EntityConfig::new().with_table_name("catalog"))
                    .with_attributes([
                        Attribute::string("sku").unwrap().unique(),
                        Attribute::int("stock")
                            .unwrap()
                            .with_default(DefaultValue::Int(0)),
                        Attribute::text("notes").unwrap().optional(),
                    ]),
            )
            .unwrap();

        let plan = plan(&graph, product);
        assert_eq!(plan.class_name, "Product");
        assert_eq!(plan.table_name, "catalog");
        assert_eq!(plan.database_import, "..database");
        assert_eq!(
            plan.columns[1],
            ColumnPlan {
                name: "stock".to_string(),
                persistence_type: "Integer".to_string(),
                source_type: "i32".to_string(),
                default: Some("0".to_string()),
                unique: false,
                nullable: false,
            }
        );
        assert!(plan.columns[0].unique);
        assert!(plan.columns[2].nullable);
        assert!(plan.references.is_empty());
    }

    #[test]
    fn test_mirrored_one_to_many() {
        let (mut graph, ids) = graph_with(&["user", "post"]);
        let (user, post) = (ids[0], ids[1]);
        graph.add_one_to_many(user, post, "posts", Some("author"), false).unwrap();

        let user_plan = plan(&graph, user);
        assert!(user_plan.foreign_keys.is_empty());
        let posts = user_plan.reference("posts").unwrap();
        assert!(posts.many);
        assert_eq!(posts.target_class, "Post");
        assert_eq!(posts.target_import, ".post_model");
        assert_eq!(posts.back_populates.as_deref(), Some("author"));
        assert_eq!(posts.cascade, Some(Cascade::DeleteOrphan));
        assert_eq!(posts.id_accessor.as_deref(), Some("posts_id"));

        let post_plan = plan(&graph, post);
        assert_eq!(
            post_plan.foreign_key("author_id"),
            Some(&ForeignKeyPlan {
                column: "author_id".to_string(),
                target_table: "users".to_string(),
                nullable: false,
                unique: false,
            })
        );
        assert_eq!(post_plan.foreign_keys[0].target(), "users.id");
        let author = post_plan.reference("author").unwrap();
        assert!(!author.many);
        assert_eq!(author.back_populates.as_deref(), Some("posts"));
        assert_eq!(author.id_accessor, None);
    }

    #[test]
    fn test_cascade_on_inbound_collection() {
        let (mut graph, ids) = graph_with(&["post", "user"]);
        let (post, user) = (ids[0], ids[1]);
        graph.add_many_to_one(post, user, "author", Some("posts"), false).unwrap();
        graph.add_many_to_one(post, user, "editor", Some("edited_posts"), true).unwrap();

        let user_plan = plan(&graph, user);
        assert_eq!(user_plan.reference("posts").unwrap().cascade, Some(Cascade::DeleteOrphan));
        assert_eq!(user_plan.reference("edited_posts").unwrap().cascade, None);

        let post_plan = plan(&graph, post);
        assert_eq!(post_plan.foreign_keys.len(), 2);
        assert!(post_plan.foreign_key("editor_id").unwrap().nullable);
        assert!(post_plan.references.iter().all(|r| r.cascade.is_none()));
    }

    #[test]
    fn test_plain_edge_never_cascades() {
        let (mut graph, ids) = graph_with(&["user", "post"]);
        graph.add_one_to_many(ids[0], ids[1], "posts", None, false).unwrap();

        let user_plan = plan(&graph, ids[0]);
        let posts = user_plan.reference("posts").unwrap();
        assert_eq!(posts.cascade, None);
        assert_eq!(posts.back_populates, None);
        assert!(plan(&graph, ids[1]).references.is_empty());
    }

    #[test]
    fn test_one_to_one_foreign_key_is_unique() {
        let (mut graph, ids) = graph_with(&["user", "profile"]);
        graph.add_one_to_one(ids[0], ids[1], "profile", Some("user"), true).unwrap();

        let user_plan = plan(&graph, ids[0]);
        let fk = user_plan.foreign_key("profile_id").unwrap();
        assert!(fk.unique);
        assert!(fk.nullable);
        assert_eq!(fk.target_table, "profiles");

        let profile_plan = plan(&graph, ids[1]);
        assert!(profile_plan.foreign_key("user_id").unwrap().unique);
    }

    #[test]
    fn test_many_to_many_association() {
        let (mut graph, ids) = graph_with(&["post", "tag"]);
        let (post, tag) = (ids[0], ids[1]);
        graph.add_many_to_many(post, tag, "tags", "posts", false).unwrap();

        let post_plan = plan(&graph, post);
        assert_eq!(
            post_plan.association_tables,
            vec![AssociationTable {
                variable: "tag_post_association".to_string(),
                table_name: "tag_post".to_string(),
                columns: [
                    AssociationColumn {
                        name: "tag_id".to_string(),
                        target_table: "tags".to_string(),
                    },
                    AssociationColumn {
                        name: "post_id".to_string(),
                        target_table: "posts".to_string(),
                    },
                ],
            }]
        );
        let tags = post_plan.reference("tags").unwrap();
        assert_eq!(tags.association_table.as_deref(), Some("tag_post_association"));
        assert_eq!(tags.cascade, Some(Cascade::Delete));
        assert!(post_plan.foreign_keys.is_empty());
        assert!(post_plan.association_imports.is_empty());

        let tag_plan = plan(&graph, tag);
        assert!(tag_plan.association_tables.is_empty());
        assert_eq!(
            tag_plan.association_imports,
            vec![AssociationImport {
                import: ".post_model".to_string(),
                variable: "tag_post_association".to_string(),
            }]
        );
        let posts = tag_plan.reference("posts").unwrap();
        assert_eq!(posts.association_table.as_deref(), Some("tag_post_association"));
        assert_eq!(posts.cascade, None);
    }

    #[test]
    fn test_parallel_edges_name_their_foreign_key() {
        let (mut graph, ids) = graph_with(&["message", "user"]);
        let (message, user) = (ids[0], ids[1]);
        graph.add_many_to_one(message, user, "sender", Some("sent"), false).unwrap();
        graph.add_many_to_one(message, user, "receiver", Some("received"), false).unwrap();

        let message_plan = plan(&graph, message);
        assert_eq!(
            message_plan.reference("sender").unwrap().foreign_key.as_deref(),
            Some("sender_id")
        );
        assert_eq!(
            message_plan.reference("receiver").unwrap().foreign_key.as_deref(),
            Some("receiver_id")
        );
    }

    #[test]
    fn test_self_reference_remote_side() {
        let (mut graph, ids) = graph_with(&["employee"]);
        let employee = ids[0];
        graph
            .add_many_to_one(employee, employee, "manager", Some("reports"), true)
            .unwrap();

        let plan = plan(&graph, employee);
        let manager = plan.reference("manager").unwrap();
        assert!(manager.remote_side);
        assert_eq!(manager.target_import, ".employee_model");
        assert!(plan.foreign_key("manager_id").unwrap().nullable);

        let reports = plan.reference("reports").unwrap();
        assert!(!reports.remote_side);
        assert!(reports.many);
        assert_eq!(reports.cascade, None);
    }

    #[test]
    fn test_cascade_names() {
        assert_eq!(Cascade::Delete.display_name(), "all, delete");
        assert_eq!(Cascade::DeleteOrphan.display_name(), "all, delete-orphan");
    }
}
