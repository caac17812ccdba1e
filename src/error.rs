//! Error types for the engine registry and its preference stores.

use std::path::PathBuf;

/// Errors raised by a [`PreferenceStore`](crate::prefs::PreferenceStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("preference store I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file could not be encoded or decoded.
    #[error("preference store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key holds a value of a different type than the one requested.
    #[error("preference '{key}' holds a {found}, expected a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The store's lock was poisoned by a panicking writer.
    #[error("preference store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by [`EngineRegistry`](crate::engines::EngineRegistry) operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The catalog supplied no engines, so no default can exist.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation referenced a short name absent from the catalog.
    #[error("unknown search engine: {0}")]
    NotFound(String),

    /// Persisting or restoring state failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for registry results.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = RegistryError::NotFound("Lycos".into());
        assert_eq!(err.to_string(), "unknown search engine: Lycos");
    }

    #[test]
    fn test_display_configuration() {
        let err = RegistryError::Configuration("catalog is empty".into());
        assert_eq!(err.to_string(), "configuration error: catalog is empty");
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: RegistryError = StoreError::TypeMismatch {
            key: "search.defaultEngineName".into(),
            expected: "string",
            found: "bool",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "preference 'search.defaultEngineName' holds a bool, expected a string"
        );
    }
}
