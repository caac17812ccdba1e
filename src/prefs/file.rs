//! JSON file-backed preference store
//!
//! The whole profile is one JSON object. Every write rewrites the file
//! atomically (temp file, fsync, rename) before returning, so a crash never
//! leaves a half-written profile behind.

use super::{PrefValue, PreferenceStore};
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Preference store persisted to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, PrefValue>>,
}

impl FileStore {
    /// Open the store at `path`, reading existing values.
    ///
    /// A missing file is treated as an empty profile; it is created on the
    /// first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(io_error(&path))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened preference store {} ({} keys)", path.display(), values.len());

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `update` to a copy of the values, write it out, then commit it
    /// in memory. A failed write leaves both file and memory untouched.
    fn write_with(
        &self,
        update: impl FnOnce(&mut BTreeMap<String, PrefValue>),
    ) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = values.clone();
        update(&mut next);
        write_atomic(&self.path, &serde_json::to_string_pretty(&next)?)?;
        *values = next;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        self.write_with(|values| {
            values.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.write_with(|values| {
            values.remove(key);
        })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp_path).map_err(io_error(&tmp_path))?;
    file.write_all(content.as_bytes()).map_err(io_error(&tmp_path))?;
    file.sync_all().map_err(io_error(&tmp_path))?;
    std::fs::rename(&tmp_path, path).map_err(io_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::keys;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("prefs.json")).unwrap();
        assert!(store.get_string(keys::DEFAULT_ENGINE_NAME).unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("prefs.json");

        let store = FileStore::open(&path).unwrap();
        store.set_string(keys::DEFAULT_ENGINE_NAME, "Bing").unwrap();
        store.set_bool(keys::SUGGESTIONS_ENABLED, true).unwrap();
        store
            .set_string(keys::MIGRATION_OLD_DEFAULT_NAME, "Yahoo")
            .unwrap();
        store.remove(keys::MIGRATION_OLD_DEFAULT_NAME).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_string(keys::DEFAULT_ENGINE_NAME).unwrap(),
            Some("Bing".to_string())
        );
        assert_eq!(reopened.get_bool(keys::SUGGESTIONS_ENABLED).unwrap(), Some(true));
        assert!(reopened
            .get_string(keys::MIGRATION_OLD_DEFAULT_NAME)
            .unwrap()
            .is_none());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
