//! Upgrade configuration
//!
//! Reads RON or JSON configuration into a tree, then builds the tier index
//! from it. Each bad entry is reported and skipped on its own.

pub mod builder;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod section;

pub use builder::{build_index, IndexBuilder};
pub use catalog::{Catalog, VanillaCatalog};
pub use error::ConfigError;
pub use loader::{export_default_config, UpgradeConfig, DEFAULT_CONFIG};
pub use section::ConfigSection;
