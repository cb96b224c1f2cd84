//! File layout of a generated application
//!
//! `LayoutConfig` decides where each generated module lives and what its
//! classes are called. Every location is a slash-separated path from the
//! project root without an extension; cross-module imports are derived from
//! two locations with [`resolve_reference`].
//!
//! Layouts load from TOML. Every key is optional and falls back to the
//! default layout:
//!
//! ```toml
//! app_folder = "service"
//!
//! [models]
//! folder = "entities"
//! extension = "_entity"
//!
//! [suffixes]
//! read = "Out"
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use warpgen_core::error::ResultExt;
use warpgen_core::{EngineError, EngineResult, Validatable};
use warpgen_ir::Entity;

use crate::module_path::resolve_reference;

// ============================================================================
// File Kinds
// ============================================================================

/// Per-entity generated file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Model,
    Route,
    Schema,
    Repository,
    Service,
}

impl FileKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FileKind::Model => "Model",
            FileKind::Route => "Route",
            FileKind::Schema => "Schema",
            FileKind::Repository => "Repository",
            FileKind::Service => "Service",
        }
    }

    /// Get all file kinds
    pub fn all() -> &'static [FileKind] {
        &[
            FileKind::Model,
            FileKind::Route,
            FileKind::Schema,
            FileKind::Repository,
            FileKind::Service,
        ]
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Layout Configuration
// ============================================================================

/// Folder and module-name suffix for one file kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderLayout {
    pub folder: String,
    pub extension: String,
}

impl FolderLayout {
    pub fn new(folder: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            extension: extension.into(),
        }
    }

    pub fn models() -> Self {
        Self::new("models", "_model")
    }

    pub fn routes() -> Self {
        Self::new("routes", "_route")
    }

    pub fn schemas() -> Self {
        Self::new("schemas", "_schema")
    }

    pub fn repositories() -> Self {
        Self::new("repository", "_repository")
    }

    pub fn services() -> Self {
        Self::new("services", "_service")
    }
}

/// A `[models]`-style table where either key may be left out
#[derive(Deserialize)]
struct PartialFolder {
    folder: Option<String>,
    extension: Option<String>,
}

impl PartialFolder {
    fn over(self, defaults: FolderLayout) -> FolderLayout {
        FolderLayout {
            folder: self.folder.unwrap_or(defaults.folder),
            extension: self.extension.unwrap_or(defaults.extension),
        }
    }
}

fn folder_or<'de, D: Deserializer<'de>>(
    deserializer: D,
    defaults: FolderLayout,
) -> Result<FolderLayout, D::Error> {
    PartialFolder::deserialize(deserializer).map(|partial| partial.over(defaults))
}

fn models_folder<'de, D: Deserializer<'de>>(d: D) -> Result<FolderLayout, D::Error> {
    folder_or(d, FolderLayout::models())
}

fn routes_folder<'de, D: Deserializer<'de>>(d: D) -> Result<FolderLayout, D::Error> {
    folder_or(d, FolderLayout::routes())
}

fn schemas_folder<'de, D: Deserializer<'de>>(d: D) -> Result<FolderLayout, D::Error> {
    folder_or(d, FolderLayout::schemas())
}

fn repositories_folder<'de, D: Deserializer<'de>>(d: D) -> Result<FolderLayout, D::Error> {
    folder_or(d, FolderLayout::repositories())
}

fn services_folder<'de, D: Deserializer<'de>>(d: D) -> Result<FolderLayout, D::Error> {
    folder_or(d, FolderLayout::services())
}

/// Class-name suffixes appended to entity class names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassSuffixes {
    pub base: String,
    pub create: String,
    pub read: String,
    pub edit: String,
    /// Appended to the plural class name
    pub pagination: String,
    pub repository: String,
    pub service: String,
}

impl Default for ClassSuffixes {
    fn default() -> Self {
        Self {
            base: "Base".to_string(),
            create: "Create".to_string(),
            read: "Response".to_string(),
            edit: "Edit".to_string(),
            pagination: "Response".to_string(),
            repository: "Repository".to_string(),
            service: "Service".to_string(),
        }
    }
}

/// Where generated modules live and what their classes are called
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Root package of the generated application
    pub app_folder: String,

    /// Shared modules directly under the app folder
    pub database_module: String,
    pub base_module: String,
    pub dependencies_module: String,
    pub settings_module: String,

    /// Shared modules inside a kind's folder
    pub main_routes_module: String,
    pub common_schema_module: String,
    pub repository_base_module: String,

    /// Parent class of every pagination shape, declared in the common schema module
    pub pagination_class: String,
    /// Parent class of every repository, declared in the repository base module
    pub repository_base_class: String,

    /// Per-kind folders; a table may set only one of its keys
    #[serde(deserialize_with = "models_folder")]
    pub models: FolderLayout,
    #[serde(deserialize_with = "routes_folder")]
    pub routes: FolderLayout,
    #[serde(deserialize_with = "schemas_folder")]
    pub schemas: FolderLayout,
    #[serde(deserialize_with = "repositories_folder")]
    pub repositories: FolderLayout,
    #[serde(deserialize_with = "services_folder")]
    pub services: FolderLayout,

    pub suffixes: ClassSuffixes,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            app_folder: "app".to_string(),
            models: FolderLayout::models(),
            routes: FolderLayout::routes(),
            schemas: FolderLayout::schemas(),
            repositories: FolderLayout::repositories(),
            services: FolderLayout::services(),
            database_module: "database".to_string(),
            base_module: "base".to_string(),
            dependencies_module: "dependencies".to_string(),
            settings_module: "settings".to_string(),
            main_routes_module: "main_routes".to_string(),
            common_schema_module: "common_schema".to_string(),
            repository_base_module: "base".to_string(),
            pagination_class: "Pagination".to_string(),
            repository_base_class: "Repository".to_string(),
            suffixes: ClassSuffixes::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML layout
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let layout: LayoutConfig =
            toml::from_str(source).map_err(|e| EngineError::config(e.message().to_string()))?;
        layout.validate()?;
        debug!(app = %layout.app_folder, "loaded layout configuration");
        Ok(layout)
    }

    /// Read a TOML layout file; a missing file yields the default layout
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "layout file not found, using defaults");
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)
            .with_context(format!("Reading layout {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(format!("Parsing layout {}", path.display()))
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::config(e.to_string()))
    }

    // ========================================================================
    // Module locations
    // ========================================================================

    pub fn folder(&self, kind: FileKind) -> &FolderLayout {
        match kind {
            FileKind::Model => &self.models,
            FileKind::Route => &self.routes,
            FileKind::Schema => &self.schemas,
            FileKind::Repository => &self.repositories,
            FileKind::Service => &self.services,
        }
    }

    /// File stem of an entity's module, e.g. `user_model`
    pub fn module_name(&self, kind: FileKind, entity: &Entity) -> String {
        format!("{}{}", entity.name(), self.folder(kind).extension)
    }

    /// Folder holding modules of a kind, e.g. `app/models`
    pub fn folder_path(&self, kind: FileKind) -> String {
        format!("{}/{}", self.app_folder, self.folder(kind).folder)
    }

    /// Location of an entity's module, e.g. `app/models/user_model`
    pub fn module_path(&self, kind: FileKind, entity: &Entity) -> String {
        format!("{}/{}", self.folder_path(kind), self.module_name(kind, entity))
    }

    pub fn database_path(&self) -> String {
        format!("{}/{}", self.app_folder, self.database_module)
    }

    pub fn base_path(&self) -> String {
        format!("{}/{}", self.app_folder, self.base_module)
    }

    pub fn dependencies_path(&self) -> String {
        format!("{}/{}", self.app_folder, self.dependencies_module)
    }

    pub fn settings_path(&self) -> String {
        format!("{}/{}", self.app_folder, self.settings_module)
    }

    pub fn main_routes_path(&self) -> String {
        format!("{}/{}", self.folder_path(FileKind::Route), self.main_routes_module)
    }

    pub fn common_schema_path(&self) -> String {
        format!("{}/{}", self.folder_path(FileKind::Schema), self.common_schema_module)
    }

    pub fn repository_base_path(&self) -> String {
        format!(
            "{}/{}",
            self.folder_path(FileKind::Repository),
            self.repository_base_module
        )
    }

    /// Relative reference from one module location to another
    pub fn import_reference(&self, from: &str, to: &str) -> EngineResult<String> {
        resolve_reference(from, to)
    }

    /// Relative reference between two entities' modules
    pub fn entity_import(
        &self,
        from_kind: FileKind,
        from: &Entity,
        to_kind: FileKind,
        to: &Entity,
    ) -> EngineResult<String> {
        resolve_reference(&self.module_path(from_kind, from), &self.module_path(to_kind, to))
    }

    // ========================================================================
    // Class names
    // ========================================================================

    pub fn model_class(&self, entity: &Entity) -> String {
        entity.class_name()
    }

    pub fn base_shape_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.base)
    }

    pub fn create_shape_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.create)
    }

    pub fn read_shape_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.read)
    }

    pub fn edit_shape_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.edit)
    }

    pub fn pagination_shape_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.plural_class_name(), self.suffixes.pagination)
    }

    pub fn repository_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.repository)
    }

    pub fn service_class(&self, entity: &Entity) -> String {
        format!("{}{}", entity.class_name(), self.suffixes.service)
    }
}

impl Validatable for LayoutConfig {
    fn validate(&self) -> EngineResult<()> {
        check_segment("app_folder", &self.app_folder)?;
        for kind in FileKind::all() {
            let folder = self.folder(*kind);
            check_segment(&format!("{kind} folder"), &folder.folder)?;
            if folder.extension.contains('/') {
                return Err(EngineError::config(format!(
                    "{kind} extension '{}' must not contain '/'",
                    folder.extension
                )));
            }
        }
        for (key, value) in [
            ("database_module", &self.database_module),
            ("base_module", &self.base_module),
            ("dependencies_module", &self.dependencies_module),
            ("settings_module", &self.settings_module),
            ("main_routes_module", &self.main_routes_module),
            ("common_schema_module", &self.common_schema_module),
            ("repository_base_module", &self.repository_base_module),
        ] {
            check_segment(key, value)?;
        }
        if self.suffixes.base.is_empty() {
            return Err(EngineError::config("base shape suffix cannot be empty"));
        }
        let shapes = [
            &self.suffixes.base,
            &self.suffixes.create,
            &self.suffixes.read,
            &self.suffixes.edit,
        ];
        for (i, suffix) in shapes.iter().enumerate() {
            if shapes[..i].contains(suffix) {
                return Err(EngineError::config(format!(
                    "shape suffix '{suffix}' is used twice"
                )));
            }
        }
        Ok(())
    }
}

fn check_segment(key: &str, value: &str) -> EngineResult<()> {
    if value.is_empty() || value.contains('/') {
        return Err(EngineError::config(format!(
            "{key} must be a single non-empty path segment, got '{value}'"
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
