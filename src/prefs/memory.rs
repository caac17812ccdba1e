//! In-memory preference store

use super::{PrefValue, PreferenceStore};
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Preference store that lives only as long as the process.
///
/// Cloning the handle is not supported; share it through an `Arc` so that
/// several registries constructed in turn observe the same values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, PrefValue>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.len())
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}
