//! Engine registry: ordering, default selection and quick search enablement
//!
//! The registry owns the user's view of the catalog. Every mutation updates
//! memory first and then writes the affected preference keys, so each public
//! call is durable once it returns `Ok`.
//!
//! Invariants held after construction and after every mutation:
//! - the ordered engines are a permutation of the catalog
//! - the default engine is at position 0
//! - the default engine is never disabled

use super::traits::{CatalogLoader, EngineDescriptor};
use crate::error::{RegistryError, Result};
use crate::prefs::{keys, PreferenceStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry of the user's search engines
pub struct EngineRegistry {
    /// Preference store the state is persisted to
    store: Arc<dyn PreferenceStore>,
    /// Engines in display order; the default is always first
    ordered: Vec<EngineDescriptor>,
    /// Current default engine
    default_name: String,
    /// Default resolved when the registry was constructed
    startup_default_name: String,
    /// Engines excluded from quick search
    disabled_names: HashSet<String>,
    /// Whether the suggestions opt-in prompt has been shown
    suggestions_opt_in_shown: bool,
    /// Whether suggestion queries are permitted
    suggestions_enabled: bool,
    /// Original default, recorded the first time the user switched away from it
    migration_old_default_name: Option<String>,
}

impl EngineRegistry {
    /// Build the registry from the catalog and restore persisted state.
    ///
    /// Persisted values are reconciled against the catalog: engines that
    /// disappeared are dropped and new ones are appended alphabetically.
    pub fn new(catalog: &dyn CatalogLoader, store: Arc<dyn PreferenceStore>) -> Result<Self> {
        let mut engines: HashMap<String, EngineDescriptor> = HashMap::new();
        for engine in catalog.list_engines() {
            if engines.contains_key(&engine.short_name) {
                warn!("Ignoring duplicate catalog engine: {}", engine.short_name);
                continue;
            }
            engines.insert(engine.short_name.clone(), engine);
        }

        if engines.is_empty() {
            return Err(RegistryError::Configuration(
                "catalog contains no search engines".to_string(),
            ));
        }

        let known: HashSet<String> = engines.keys().cloned().collect();

        let region_default = catalog
            .default_engine_name()
            .filter(|name| known.contains(name));

        let ordered_names = match store.get_string_list(keys::ORDERED_ENGINE_NAMES)? {
            Some(persisted) => reconcile_order(persisted, &known),
            None => initial_order(&known, region_default.as_deref()),
        };

        let persisted_default = store.get_string(keys::DEFAULT_ENGINE_NAME)?;
        let default_name = match persisted_default {
            Some(name) if known.contains(&name) => name,
            stale => {
                if let Some(name) = stale {
                    warn!("Persisted default engine {} is no longer available", name);
                }
                region_default.unwrap_or_else(|| ordered_names[0].clone())
            }
        };

        let disabled_names: HashSet<String> = store
            .get_string_list(keys::DISABLED_ENGINE_NAMES)?
            .unwrap_or_default()
            .into_iter()
            .filter(|name| *name != default_name && known.contains(name))
            .collect();

        let suggestions_opt_in_shown = store
            .get_bool(keys::SUGGESTIONS_OPT_IN_SHOWN)?
            .unwrap_or(false);
        let suggestions_enabled = store.get_bool(keys::SUGGESTIONS_ENABLED)?.unwrap_or(false);

        let migration_old_default_name = store
            .get_string(keys::MIGRATION_OLD_DEFAULT_NAME)?
            .filter(|name| known.contains(name));

        let ordered = ordered_names
            .iter()
            .filter_map(|name| engines.remove(name))
            .collect();

        let mut registry = Self {
            store,
            ordered,
            startup_default_name: default_name.clone(),
            default_name,
            disabled_names,
            suggestions_opt_in_shown,
            suggestions_enabled,
            migration_old_default_name,
        };
        registry.normalize();

        info!(
            "Loaded {} search engines, default: {}",
            registry.ordered.len(),
            registry.default_name
        );

        Ok(registry)
    }

    /// Engines in display order, default first
    pub fn ordered_engines(&self) -> Vec<&EngineDescriptor> {
        self.ordered.iter().collect()
    }

    /// Short names in display order, default first
    pub fn ordered_names(&self) -> Vec<&str> {
        self.ordered.iter().map(|e| e.short_name.as_str()).collect()
    }

    /// The current default engine
    pub fn default_engine(&self) -> &EngineDescriptor {
        &self.ordered[0]
    }

    /// Look up an engine by short name
    pub fn engine(&self, name: &str) -> Option<&EngineDescriptor> {
        self.ordered.iter().find(|e| e.short_name == name)
    }

    /// Check if an engine exists
    pub fn contains(&self, name: &str) -> bool {
        self.engine(name).is_some()
    }

    pub fn is_engine_default(&self, name: &str) -> bool {
        self.default_name == name
    }

    pub fn is_engine_enabled(&self, name: &str) -> bool {
        !self.disabled_names.contains(name)
    }

    /// Enabled engines other than the default, in display order
    pub fn quick_search_engines(&self) -> Vec<&EngineDescriptor> {
        self.ordered
            .iter()
            .filter(|e| e.short_name != self.default_name)
            .filter(|e| self.is_engine_enabled(&e.short_name))
            .collect()
    }

    /// The original default recorded when the user first switched away from it
    pub fn migration_old_default_name(&self) -> Option<&str> {
        self.migration_old_default_name.as_deref()
    }

    /// True while the original default has been disabled by switching away
    /// from it a second time and is not the current default.
    pub fn should_disable_old_default(&self) -> bool {
        match self.migration_old_default_name {
            Some(ref old) => *old != self.default_name && self.disabled_names.contains(old),
            None => false,
        }
    }

    /// Replace the display order.
    ///
    /// Every name must be in the catalog. Engines left out are appended in
    /// case-insensitive alphabetical order. Whatever ends up first becomes
    /// the default; an empty list keeps the current default first.
    pub fn set_ordered_engines<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut requested: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        if requested.is_empty() {
            requested.push(self.default_name.clone());
        }

        if let Some(unknown) = requested.iter().find(|name| !self.contains(name)) {
            return Err(RegistryError::NotFound(unknown.clone()));
        }

        let known: HashSet<String> = self.ordered.iter().map(|e| e.short_name.clone()).collect();
        let ordered_names = reconcile_order(requested, &known);
        let new_default = ordered_names[0].clone();

        let mut by_name: HashMap<String, EngineDescriptor> = std::mem::take(&mut self.ordered)
            .into_iter()
            .map(|e| (e.short_name.clone(), e))
            .collect();
        self.ordered = ordered_names
            .iter()
            .filter_map(|name| by_name.remove(name))
            .collect();

        let default_changed = new_default != self.default_name;
        if default_changed {
            self.transition_default(new_default);
        }
        self.normalize();

        self.persist_order()?;
        if default_changed {
            self.persist_default()?;
            self.persist_migration_state()?;
        }
        Ok(())
    }

    /// Make `name` the default engine and move it to the front.
    ///
    /// Naming the current default changes nothing in memory but writes the
    /// state again, so a call that failed on a store error can be retried.
    pub fn set_default_engine(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if self.default_name != name {
            self.transition_default(name.to_string());
            self.normalize();
        }

        self.persist_order()?;
        self.persist_default()?;
        self.persist_migration_state()
    }

    /// Include an engine in quick search
    pub fn enable_engine(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if self.disabled_names.remove(name) {
            debug!("Enabled engine: {}", name);
        }
        self.persist_disabled()
    }

    /// Exclude an engine from quick search. The default cannot be disabled;
    /// the request is ignored.
    pub fn disable_engine(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if self.default_name == name {
            debug!("Ignoring request to disable the default engine {}", name);
            return Ok(());
        }
        if self.disabled_names.insert(name.to_string()) {
            debug!("Disabled engine: {}", name);
        }
        self.persist_disabled()
    }

    /// Whether the search suggestions opt-in prompt should still be shown
    pub fn should_show_search_suggestions_opt_in(&self) -> bool {
        !self.suggestions_opt_in_shown
    }

    pub fn set_should_show_search_suggestions_opt_in(&mut self, show: bool) -> Result<()> {
        self.suggestions_opt_in_shown = !show;
        self.store
            .set_bool(keys::SUGGESTIONS_OPT_IN_SHOWN, self.suggestions_opt_in_shown)?;
        Ok(())
    }

    /// Whether search suggestion queries are permitted
    pub fn should_show_search_suggestions(&self) -> bool {
        self.suggestions_enabled
    }

    pub fn set_should_show_search_suggestions(&mut self, enabled: bool) -> Result<()> {
        self.suggestions_enabled = enabled;
        self.store.set_bool(keys::SUGGESTIONS_ENABLED, enabled)?;
        Ok(())
    }

    /// Apply the default-change rules in memory. Callers persist afterwards.
    ///
    /// The first switch away from the startup default only records it. Any
    /// later switch away from that recorded engine disables it, and switching
    /// back to it re-enables it.
    fn transition_default(&mut self, new_default: String) {
        let old_default = std::mem::replace(&mut self.default_name, new_default);
        self.disabled_names.remove(&self.default_name);

        match self.migration_old_default_name.clone() {
            None if old_default == self.startup_default_name => {
                debug!("Recording original default engine {}", old_default);
                self.migration_old_default_name = Some(old_default.clone());
            }
            Some(ref original) if *original == old_default => {
                info!("Disabling previous default engine {}", old_default);
                self.disabled_names.insert(old_default.clone());
            }
            Some(ref original) if *original == self.default_name => {
                debug!("Original default engine {} restored", original);
            }
            _ => {}
        }

        info!(
            "Default search engine changed from {} to {}",
            old_default, self.default_name
        );
    }

    /// Keep the default at position 0
    fn normalize(&mut self) {
        if let Some(pos) = self
            .ordered
            .iter()
            .position(|e| e.short_name == self.default_name)
        {
            if pos != 0 {
                let engine = self.ordered.remove(pos);
                self.ordered.insert(0, engine);
            }
        }
    }

    fn persist_order(&self) -> Result<()> {
        let names: Vec<String> = self.ordered.iter().map(|e| e.short_name.clone()).collect();
        debug!("Persisting engine order: {:?}", names);
        self.store
            .set_string_list(keys::ORDERED_ENGINE_NAMES, &names)?;
        Ok(())
    }

    fn persist_default(&self) -> Result<()> {
        debug!("Persisting default engine: {}", self.default_name);
        self.store
            .set_string(keys::DEFAULT_ENGINE_NAME, &self.default_name)?;
        Ok(())
    }

    fn persist_disabled(&self) -> Result<()> {
        let names: Vec<String> = self
            .ordered
            .iter()
            .map(|e| e.short_name.clone())
            .filter(|name| self.disabled_names.contains(name))
            .collect();
        debug!("Persisting disabled engines: {:?}", names);
        self.store
            .set_string_list(keys::DISABLED_ENGINE_NAMES, &names)?;
        Ok(())
    }

    fn persist_migration_state(&self) -> Result<()> {
        self.persist_disabled()?;
        match self.migration_old_default_name {
            Some(ref name) => self
                .store
                .set_string(keys::MIGRATION_OLD_DEFAULT_NAME, name)?,
            None => self.store.remove(keys::MIGRATION_OLD_DEFAULT_NAME)?,
        }
        Ok(())
    }
}

/// Case-insensitive alphabetical order, ties broken ordinally
fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// First-run order: region default first, the rest alphabetically
fn initial_order(known: &HashSet<String>, region_default: Option<&str>) -> Vec<String> {
    let mut names: Vec<String> = known.iter().cloned().collect();
    sort_names(&mut names);
    if let Some(default) = region_default {
        if let Some(pos) = names.iter().position(|name| name == default) {
            let name = names.remove(pos);
            names.insert(0, name);
        }
    }
    names
}

/// Keep the requested names that are known (first occurrence wins) and
/// append the missing known names alphabetically
fn reconcile_order(requested: Vec<String>, known: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(known.len());

    for name in requested {
        if !known.contains(&name) {
            warn!("Dropping unknown engine from saved order: {}", name);
            continue;
        }
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    let mut missing: Vec<String> = known
        .iter()
        .filter(|name| !seen.contains(*name))
        .cloned()
        .collect();
    sort_names(&mut missing);
    names.extend(missing);
    names
}
