//! Search engine module
//!
//! Defines the engine descriptor and catalog traits, and the registry that
//! tracks order, default and quick search state for a profile.

mod loader;
mod registry;
mod traits;

pub use loader::SettingsCatalog;
pub use registry::EngineRegistry;
pub use traits::*;
