//! Preference store abstraction
//!
//! The registry persists its state through a small typed key/value interface.
//! Backends only need to implement raw `get`/`set`/`remove`; the typed
//! accessors are provided on top.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Preference keys used by the engine registry
pub mod keys {
    pub const ORDERED_ENGINE_NAMES: &str = "search.orderedEngineNames";
    pub const DEFAULT_ENGINE_NAME: &str = "search.defaultEngineName";
    pub const DISABLED_ENGINE_NAMES: &str = "search.disabledEngineNames";
    pub const SUGGESTIONS_OPT_IN_SHOWN: &str = "search.suggestions.optInShown";
    pub const SUGGESTIONS_ENABLED: &str = "search.suggestions.enabled";
    pub const MIGRATION_OLD_DEFAULT_NAME: &str = "search.migration.oldDefaultName";
}

/// A stored preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    String(String),
    StringList(Vec<String>),
}

impl PrefValue {
    /// Type name used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            PrefValue::Bool(_) => "bool",
            PrefValue::String(_) => "string",
            PrefValue::StringList(_) => "string list",
        }
    }
}

/// Durable key/value storage namespaced to one profile.
///
/// Writes are synchronous: when `set` or `remove` returns `Ok`, the value is
/// durable as far as the backend can guarantee.
pub trait PreferenceStore: Send + Sync {
    /// Read the raw value under `key`
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: PrefValue) -> Result<(), StoreError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(key, "string", &other)),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set(key, PrefValue::String(value.to_string()))
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::StringList(list)) => Ok(Some(list)),
            Some(other) => Err(mismatch(key, "string list", &other)),
        }
    }

    fn set_string_list(&self, key: &str, values: &[String]) -> Result<(), StoreError> {
        self.set(key, PrefValue::StringList(values.to_vec()))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(mismatch(key, "bool", &other)),
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, PrefValue::Bool(value))
    }
}

fn mismatch(key: &str, expected: &'static str, found: &PrefValue) -> StoreError {
    StoreError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let store = MemoryStore::new();
        store.set_string(keys::DEFAULT_ENGINE_NAME, "Bing").unwrap();
        store.set_bool(keys::SUGGESTIONS_ENABLED, true).unwrap();
        store
            .set_string_list(keys::DISABLED_ENGINE_NAMES, &["Twitter".to_string()])
            .unwrap();

        assert_eq!(
            store.get_string(keys::DEFAULT_ENGINE_NAME).unwrap(),
            Some("Bing".to_string())
        );
        assert_eq!(store.get_bool(keys::SUGGESTIONS_ENABLED).unwrap(), Some(true));
        assert_eq!(
            store.get_string_list(keys::DISABLED_ENGINE_NAMES).unwrap(),
            Some(vec!["Twitter".to_string()])
        );
        assert_eq!(store.get_bool(keys::SUGGESTIONS_OPT_IN_SHOWN).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch() {
        let store = MemoryStore::new();
        store.set_bool(keys::DEFAULT_ENGINE_NAME, false).unwrap();

        let err = store.get_string(keys::DEFAULT_ENGINE_NAME).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: "string", found: "bool", .. }
        ));
    }

    #[test]
    fn test_untagged_json_shape() {
        let json = r#"{"a": true, "b": "Yahoo", "c": ["Bing", "Google"]}"#;
        let values: std::collections::HashMap<String, PrefValue> =
            serde_json::from_str(json).unwrap();
        assert_eq!(values["a"], PrefValue::Bool(true));
        assert_eq!(values["b"], PrefValue::String("Yahoo".into()));
        assert_eq!(
            values["c"],
            PrefValue::StringList(vec!["Bing".into(), "Google".into()])
        );
    }
}
