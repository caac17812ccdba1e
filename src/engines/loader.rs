//! Catalog loader backed by configuration

use super::traits::{CatalogLoader, EngineDescriptor};
use crate::config::{EngineConfig, Settings};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Catalog built from the `engines` section of [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsCatalog {
    engines: Vec<EngineDescriptor>,
    default_engine: Option<String>,
}

impl SettingsCatalog {
    /// Build the catalog from settings
    pub fn load(settings: &Settings) -> Self {
        let mut seen = HashSet::new();
        let mut engines = Vec::new();

        for config in settings.engines.iter().filter(|e| e.disabled) {
            info!("Skipping disabled engine: {}", config.name);
        }

        for config in settings.enabled_engines() {
            if config.name.trim().is_empty() {
                warn!("Skipping engine with empty name ({})", config.search_url);
                continue;
            }
            if !seen.insert(config.name.clone()) {
                warn!("Skipping duplicate engine: {}", config.name);
                continue;
            }

            debug!("Loaded engine: {}", config.name);
            engines.push(Self::descriptor(config));
        }

        info!("Loaded {} engines", engines.len());

        Self {
            engines,
            default_engine: settings.search.default_engine.clone(),
        }
    }

    fn descriptor(config: &EngineConfig) -> EngineDescriptor {
        let mut descriptor = EngineDescriptor::new(&config.name, &config.search_url);
        if let Some(ref url) = config.suggest_url {
            descriptor = descriptor.suggest_template(url);
        }
        if let Some(ref icon) = config.icon {
            descriptor = descriptor.icon(icon);
        }
        descriptor
    }
}

impl CatalogLoader for SettingsCatalog {
    fn list_engines(&self) -> Vec<EngineDescriptor> {
        self.engines.clone()
    }

    fn default_engine_name(&self) -> Option<String> {
        self.default_engine.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = SettingsCatalog::load(&Settings::default());
        assert_eq!(catalog.list_engines().len(), 7);
        assert_eq!(catalog.default_engine_name().as_deref(), Some("Yahoo"));

        let engines = catalog.list_engines();
        let twitter = engines.iter().find(|e| e.short_name == "Twitter").unwrap();
        assert!(twitter.suggest_template.is_none());
    }

    #[test]
    fn test_skips_disabled_and_duplicates() {
        let mut settings = Settings::default();
        settings.engines.push(EngineConfig {
            name: "Bing".to_string(),
            search_url: "https://example.com/?q={searchTerms}".to_string(),
            ..Default::default()
        });
        settings.engines.push(EngineConfig {
            name: "Ecosia".to_string(),
            disabled: true,
            ..Default::default()
        });
        settings.engines.push(EngineConfig::default());

        let catalog = SettingsCatalog::load(&settings);
        assert_eq!(catalog.list_engines().len(), 7);

        let bing = catalog
            .list_engines()
            .into_iter()
            .find(|e| e.short_name == "Bing")
            .unwrap();
        assert_eq!(bing.search_template, "https://www.bing.com/search?q={searchTerms}");
    }
}
