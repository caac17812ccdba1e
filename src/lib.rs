//! search-engines: per-profile search engine preferences
//!
//! Keeps track of which engines a user has, their display order, the default
//! engine, which engines are offered for quick search, and the search
//! suggestion opt-in state. Everything is persisted through a pluggable
//! preference store.

pub mod config;
pub mod engines;
pub mod error;
pub mod prefs;

pub use config::Settings;
pub use engines::{CatalogLoader, EngineDescriptor, EngineRegistry};
pub use error::{RegistryError, StoreError};
pub use prefs::PreferenceStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
