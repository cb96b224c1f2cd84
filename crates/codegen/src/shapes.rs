//! Payload-shape planning
//!
//! Every entity gets three payload classes: a read shape returned by the API,
//! a create shape accepted on insert and an edit shape accepted on partial
//! update. Fields they have in common are moved into a base class when that
//! saves declarations; a pagination shape wraps a list of read shapes.

use serde::Serialize;
use tracing::info;
use warpgen_core::{DataType, EngineError, EngineResult, EntityId};
use warpgen_ir::{Attribute, Edge, ModelGraph, ID_MEMBER};

use crate::layout::{FileKind, LayoutConfig};
use crate::minimize::{FactoredSet, OrderedSet, factor};

// ============================================================================
// Fields
// ============================================================================

/// One declared member of a payload class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeField {
    pub name: String,
    pub type_name: String,
    /// Holds a list of `type_name`
    pub list: bool,
    /// May be omitted by the client
    pub optional: bool,
    /// Literal default, if any
    pub default: Option<String>,
}

impl ShapeField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            list: false,
            optional: false,
            default: None,
        }
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Field of an attribute
    pub fn from_attribute(attribute: &Attribute) -> Self {
        let mut field = Self::new(attribute.name(), attribute.data_type.payload_type());
        field.optional = attribute.optional;
        field.default = attribute.default.as_ref().map(|d| d.to_literal());
        field
    }

    /// Id field of a relationship edge, `<name>_id`
    pub fn from_edge(edge: &Edge<'_>) -> Self {
        let many = edge.is_many();
        let mut field = Self::new(
            format!("{}_id", edge.name()),
            DataType::int().payload_type(),
        );
        field.list = many;
        field.optional = edge.relationship().optional() || many;
        field
    }

    /// Same field, but no longer required
    pub fn relaxed(&self) -> Self {
        let mut field = self.clone();
        field.optional = true;
        field
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// A planned payload class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeClass {
    pub class_name: String,
    /// Parent class when it inherits from the base shape or pagination
    pub parent: Option<String>,
    pub fields: Vec<ShapeField>,
}

impl ShapeClass {
    /// Whether the class extends another planned class
    pub fn inherits(&self) -> bool {
        self.parent.is_some()
    }
}

/// All payload classes of one entity, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeFamily {
    pub entity: String,
    pub base: ShapeClass,
    pub pagination: ShapeClass,
    pub read: ShapeClass,
    pub create: ShapeClass,
    pub edit: ShapeClass,
    /// Reference from the schema module to the module declaring pagination
    pub pagination_import: String,
}

impl ShapeFamily {
    /// Classes in the order they are declared
    pub fn classes(&self) -> [&ShapeClass; 5] {
        [&self.base, &self.pagination, &self.read, &self.create, &self.edit]
    }
}

/// Payload fields of an entity: attributes, then one id field per edge
pub fn payload_fields(graph: &ModelGraph, entity: EntityId) -> EngineResult<Vec<ShapeField>> {
    let ctx = graph.entity(entity)?;
    let mut fields: Vec<ShapeField> = ctx
        .attributes()
        .iter()
        .map(ShapeField::from_attribute)
        .collect();
    fields.extend(graph.edges(entity)?.iter().map(ShapeField::from_edge));
    Ok(fields)
}

/// Plan the payload classes of an entity
pub fn plan_shapes(
    graph: &ModelGraph,
    entity: EntityId,
    layout: &LayoutConfig,
) -> EngineResult<ShapeFamily> {
    let ctx = graph.entity(entity)?;
    let fields = payload_fields(graph, entity)?;

    let create: OrderedSet<ShapeField> = fields.iter().cloned().collect();
    let edit: OrderedSet<ShapeField> = fields.iter().map(ShapeField::relaxed).collect();
    let read: OrderedSet<ShapeField> = fields
        .iter()
        .cloned()
        .chain(std::iter::once(ShapeField::new(
            ID_MEMBER,
            DataType::int().payload_type(),
        )))
        .collect();

    let factoring = factor(&[read, create, edit]);
    let base_class = layout.base_shape_class(ctx);
    let class_names = [
        layout.read_shape_class(ctx),
        layout.create_shape_class(ctx),
        layout.edit_shape_class(ctx),
    ];
    let shapes: Vec<ShapeClass> = class_names
        .into_iter()
        .zip(&factoring.members)
        .map(|(class_name, member): (String, &FactoredSet<ShapeField>)| ShapeClass {
            class_name,
            parent: member.inherits_base.then(|| base_class.clone()),
            fields: member.items.clone(),
        })
        .collect();
    let [read, create, edit]: [ShapeClass; 3] = shapes.try_into().map_err(|_| {
        EngineError::entity_validation(ctx.name(), "payload shapes could not be factored")
    })?;

    let pagination = ShapeClass {
        class_name: layout.pagination_shape_class(ctx),
        parent: Some(layout.pagination_class.clone()),
        fields: vec![ShapeField::new("data", read.class_name.clone()).list()],
    };
    let pagination_import = layout.import_reference(
        &layout.module_path(FileKind::Schema, ctx),
        &layout.common_schema_path(),
    )?;

    info!(
        entity = ctx.name(),
        shared = factoring.base.len(),
        read_inherits = read.inherits(),
        create_inherits = create.inherits(),
        edit_inherits = edit.inherits(),
        "planned payload shapes"
    );

    Ok(ShapeFamily {
        entity: ctx.name().to_string(),
        base: ShapeClass {
            class_name: base_class,
            parent: None,
            fields: factoring.base,
        },
        pagination,
        read,
        create,
        edit,
        pagination_import,
    })
}

// ============================================================================
// Tests
// ============================================================================
