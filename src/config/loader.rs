//! Configuration files
//!
//! Loads an upgrade configuration from RON or JSON, with fallback to the
//! defaults compiled into the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::tiers::DimensionIndex;

use super::builder::build_index;
use super::catalog::Catalog;
use super::error::ConfigError;
use super::section::ConfigSection;

/// Default configuration shipped with the crate
pub const DEFAULT_CONFIG: &str = include_str!("../../assets/config.ron");

/// A parsed configuration tree, not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeConfig {
    tree: Value,
}

impl UpgradeConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            tree: ron::from_str(text)?,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            tree: serde_json::from_str(text)?,
        })
    }

    /// Load a `.ron` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match extension(path).as_deref() {
            Some("ron") => Self::from_ron_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The built-in defaults
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_ron_str(DEFAULT_CONFIG)
    }

    /// Load `path`, falling back to the built-in defaults when it is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded upgrade config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::defaults().unwrap_or_else(|e| {
                    log::error!("Built-in upgrade config is invalid: {}", e);
                    Self { tree: Value::Object(Default::default()) }
                })
            }
        }
    }

    pub fn root(&self) -> Result<ConfigSection<'_>, ConfigError> {
        ConfigSection::root(&self.tree)
    }

    /// Build the tier index, logging and skipping bad entries
    pub fn build_index(&self, catalog: &dyn Catalog) -> Result<(DimensionIndex, Vec<ConfigError>), ConfigError> {
        Ok(build_index(&self.root()?, catalog))
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Write the default configuration to `path` for editing. A `.json` path gets
/// the defaults converted to JSON; anything else gets the RON text.
pub fn export_default_config(path: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let text = match extension(path).as_deref() {
        Some("json") => serde_json::to_string_pretty(&UpgradeConfig::defaults()?.tree)?,
        _ => DEFAULT_CONFIG.to_string(),
    };
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Exported default upgrade config to {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VanillaCatalog;
    use crate::tiers::{Dimension, Material};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("upgrades-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_default_config_builds_cleanly() {
        let config = UpgradeConfig::defaults().unwrap();
        let (index, diagnostics) = config.build_index(&VanillaCatalog).unwrap();

        assert!(diagnostics.is_empty(), "default config has bad entries: {:?}", diagnostics);
        assert!(index.has_range_upgrade());
        assert!(index.is_managed(&Dimension::BlockLimit(Material::new("HOPPER")), "BSkyBlock"));
        assert!(index.resolve_tier(&Dimension::Range, "BSkyBlock", 0).is_some());
    }

    #[test]
    fn test_ron_and_json_agree() {
        let ron_text = r#"{ "range-upgrade": { "t": { "max-level": 3, "upgrade": "[level]" } } }"#;
        let json_text = r#"{ "range-upgrade": { "t": { "max-level": 3, "upgrade": "[level]" } } }"#;
        assert_eq!(
            UpgradeConfig::from_ron_str(ron_text).unwrap(),
            UpgradeConfig::from_json_str(json_text).unwrap()
        );
    }

    #[test]
    fn test_export_then_load() {
        let ron_path = temp_path("export.ron");
        let json_path = temp_path("export.json");
        export_default_config(&ron_path).unwrap();
        export_default_config(&json_path).unwrap();

        let from_ron = UpgradeConfig::load(&ron_path).unwrap();
        let from_json = UpgradeConfig::load(&json_path).unwrap();
        assert_eq!(from_ron, from_json);
        assert_eq!(from_ron, UpgradeConfig::defaults().unwrap());

        let _ = fs::remove_file(ron_path);
        let _ = fs::remove_file(json_path);
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = UpgradeConfig::load_or_default(&temp_path("missing.ron"));
        assert_eq!(config, UpgradeConfig::defaults().unwrap());
    }

    #[test]
    fn test_unsupported_extension() {
        let path = temp_path("config.yml");
        fs::write(&path, "range-upgrade: {}").unwrap();
        assert!(matches!(UpgradeConfig::load(&path), Err(ConfigError::UnsupportedFormat(_))));
        let _ = fs::remove_file(path);
    }
}
