//! Attribute definitions
//!
//! An `Attribute` is a typed field of an entity. It is built once, validated
//! on construction, and afterwards only replaced as a whole; planners copy
//! it by value into every generated shape that carries it.

use serde::{Deserialize, Serialize};
use warpgen_core::{DataType, EngineResult, validate_name};

// ============================================================================
// Attribute
// ============================================================================

/// A named, typed field of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Field name (snake_case)
    name: String,

    /// Semantic type tag
    pub data_type: DataType,

    /// Literal default, if any
    pub default: Option<DefaultValue>,

    /// Values must be unique across rows
    pub unique: bool,

    /// Field may be absent
    pub optional: bool,
}

impl Attribute {
    /// Create a new attribute, validating its name
    pub fn new(name: impl Into<String>, data_type: DataType) -> EngineResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            data_type,
            default: None,
            unique: false,
            optional: false,
        })
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the default value
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    // ========================================================================
    // Presets
    // ========================================================================

    pub fn string(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::string())
    }

    pub fn text(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::text())
    }

    pub fn int(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::int())
    }

    pub fn big_int(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::big_int())
    }

    pub fn float(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::float())
    }

    pub fn decimal(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::decimal())
    }

    pub fn bool(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::bool())
    }

    pub fn date(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::date())
    }

    pub fn date_time(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::date_time())
    }

    pub fn time(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::time())
    }

    pub fn interval(name: impl Into<String>) -> EngineResult<Self> {
        Self::new(name, DataType::interval())
    }

    /// Unique `email` field
    pub fn email() -> Self {
        Self::fixed("email", DataType::email()).unique()
    }

    /// Unique `username` field
    pub fn username() -> Self {
        Self::fixed("username", DataType::string()).unique()
    }

    /// Plain `name` field
    pub fn name_field() -> Self {
        Self::fixed("name", DataType::string())
    }

    /// Long-form `description` field
    pub fn description() -> Self {
        Self::fixed("description", DataType::text())
    }

    /// Presets with literal names skip validation
    fn fixed(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            default: None,
            unique: false,
            optional: false,
        }
    }
}

// ============================================================================
// Default Values
// ============================================================================

/// Literal default for an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Expression passed through verbatim
    Expression(String),
}

impl DefaultValue {
    /// Literal as it appears in generated source
    pub fn to_literal(&self) -> String {
        match self {
            DefaultValue::Bool(v) => v.to_string(),
            DefaultValue::Int(v) => v.to_string(),
            DefaultValue::Float(v) => format!("{v:?}"),
            DefaultValue::String(v) => format!("{v:?}"),
            DefaultValue::Expression(expr) => expr.clone(),
        }
    }
}

impl std::fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

// ============================================================================
// Tests
// ============================================================================
