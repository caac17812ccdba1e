//! Settings structures for search-engines configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub storage: StorageSettings,
    pub engines: Vec<EngineConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            search: SearchSettings::default(),
            storage: StorageSettings::default(),
            engines: default_engines(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SEARCH_ENGINES_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SEARCH_ENGINES_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SEARCH_ENGINES_DEFAULT_ENGINE") {
            self.search.default_engine = Some(val);
        }
        if let Ok(val) = std::env::var("SEARCH_ENGINES_PREFS_PATH") {
            self.storage.preferences_path = Some(PathBuf::from(val));
        }
    }

    /// Engines that belong in the catalog
    pub fn enabled_engines(&self) -> Vec<&EngineConfig> {
        self.engines.iter().filter(|e| !e.disabled).collect()
    }

    /// Resolved location of the preferences file
    pub fn preferences_path(&self) -> PathBuf {
        self.storage.preferences_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("search-engines")
                .join("preferences.json")
        })
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Region default engine, used on first run and when the persisted
    /// default disappears from the catalog
    pub default_engine: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_engine: Some("Yahoo".to_string()),
        }
    }
}

/// Where per-profile preferences are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Preferences file (defaults to the platform config directory)
    pub preferences_path: Option<PathBuf>,
}

/// Individual engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine short name (unique identifier, also the display name)
    pub name: String,
    /// Search URL template containing `{searchTerms}`
    pub search_url: String,
    /// Suggestion URL template, if the engine offers suggestions
    pub suggest_url: Option<String>,
    /// Icon reference (URL or data URI)
    pub icon: Option<String>,
    /// Leave the engine out of the catalog entirely
    pub disabled: bool,
}

impl EngineConfig {
    fn new(name: &str, search_url: &str, suggest_url: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            search_url: search_url.to_string(),
            suggest_url: suggest_url.map(str::to_string),
            ..Default::default()
        }
    }
}

/// Default engine catalog
fn default_engines() -> Vec<EngineConfig> {
    vec![
        EngineConfig::new(
            "Amazon.com",
            "https://www.amazon.com/s?k={searchTerms}",
            Some("https://completion.amazon.com/search/complete?q={searchTerms}"),
        ),
        EngineConfig::new(
            "Bing",
            "https://www.bing.com/search?q={searchTerms}",
            Some("https://www.bing.com/osjson.aspx?query={searchTerms}"),
        ),
        EngineConfig::new(
            "DuckDuckGo",
            "https://duckduckgo.com/?q={searchTerms}",
            Some("https://ac.duckduckgo.com/ac/?q={searchTerms}&type=list"),
        ),
        EngineConfig::new(
            "Google",
            "https://www.google.com/search?q={searchTerms}",
            Some("https://www.google.com/complete/search?client=firefox&q={searchTerms}"),
        ),
        EngineConfig::new(
            "Twitter",
            "https://twitter.com/search?q={searchTerms}",
            None,
        ),
        EngineConfig::new(
            "Wikipedia",
            "https://en.wikipedia.org/wiki/Special:Search?search={searchTerms}",
            Some("https://en.wikipedia.org/w/api.php?action=opensearch&search={searchTerms}"),
        ),
        EngineConfig::new(
            "Yahoo",
            "https://search.yahoo.com/search?p={searchTerms}",
            Some("https://search.yahoo.com/sugg/ff?command={searchTerms}&output=fxjson"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.general.debug);
        assert_eq!(settings.search.default_engine.as_deref(), Some("Yahoo"));
        assert_eq!(settings.engines.len(), 7);
    }

    #[test]
    fn test_engine_lookup() {
        let settings = Settings::default();
        let twitter = settings.engines.iter().find(|e| e.name == "Twitter");
        assert!(twitter.is_some());
        assert!(twitter.unwrap().suggest_url.is_none());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
search:
  default_engine: DuckDuckGo
storage:
  preferences_path: /tmp/prefs.json
engines:
  - name: DuckDuckGo
    search_url: "https://duckduckgo.com/?q={searchTerms}"
  - name: Ecosia
    search_url: "https://www.ecosia.org/search?q={searchTerms}"
    disabled: true
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.search.default_engine.as_deref(), Some("DuckDuckGo"));
        assert_eq!(settings.preferences_path(), PathBuf::from("/tmp/prefs.json"));
        assert_eq!(settings.engines.len(), 2);
        assert_eq!(settings.enabled_engines().len(), 1);
        assert!(!settings.general.debug);
    }
}
