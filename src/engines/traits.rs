//! Engine descriptor and catalog traits

use serde::{Deserialize, Serialize};

/// An immutable search engine definition supplied by the catalog.
///
/// Only `short_name` is interpreted by the registry; the rest is carried
/// through untouched for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Unique identifier, also used as the display name
    pub short_name: String,
    /// Search URL template containing `{searchTerms}`
    pub search_template: String,
    /// Suggestion URL template
    pub suggest_template: Option<String>,
    /// Icon reference
    pub icon: Option<String>,
}

impl EngineDescriptor {
    pub fn new(short_name: impl Into<String>, search_template: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            search_template: search_template.into(),
            suggest_template: None,
            icon: None,
        }
    }

    pub fn suggest_template(mut self, template: impl Into<String>) -> Self {
        self.suggest_template = Some(template.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Source of the locale-resolved engine catalog
pub trait CatalogLoader {
    /// All engines available to the user, in no particular order
    fn list_engines(&self) -> Vec<EngineDescriptor>;

    /// The region's default engine, if one is configured
    fn default_engine_name(&self) -> Option<String> {
        None
    }
}

/// A fixed catalog, useful for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    engines: Vec<EngineDescriptor>,
    default_engine: Option<String>,
}

impl StaticCatalog {
    pub fn new(engines: Vec<EngineDescriptor>) -> Self {
        Self {
            engines,
            default_engine: None,
        }
    }

    /// Set the region default engine
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_engine = Some(name.into());
        self
    }
}

impl CatalogLoader for StaticCatalog {
    fn list_engines(&self) -> Vec<EngineDescriptor> {
        self.engines.clone()
    }

    fn default_engine_name(&self) -> Option<String> {
        self.default_engine.clone()
    }
}
