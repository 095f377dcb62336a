use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gridmenu::{InventoryScheme, SchemeConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::paths::ProjectPaths;

fn default_tick_interval_ms() -> u64 {
    50
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No scheme named '{0}'")]
    UnknownScheme(String),

    #[error("Invalid scheme '{name}': {source}")]
    InvalidScheme {
        name: String,
        #[source]
        source: gridmenu::Error,
    },

    #[error("Failed to determine config directory")]
    NoConfigDir,
}

/// Top-level runner configuration, stored as TOML
///
/// ```toml
/// tick_interval_ms = 50
/// log_to_file = false
///
/// [schemes.main]
/// masks = ["#########", "#ppppppp#"]
/// pagination = "p"
///
/// [schemes.main.items."#"]
/// material = "GRAY_STAINED_GLASS_PANE"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMenuConfig {
    /// Length of one host tick
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub log_to_file: bool,

    /// Named menu layouts
    #[serde(default)]
    pub schemes: BTreeMap<String, SchemeConfig>,
}

impl Default for GridMenuConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            log_to_file: false,
            schemes: BTreeMap::new(),
        }
    }
}

impl GridMenuConfig {
    pub fn config_path() -> Result<PathBuf, ConfigLoadError> {
        let paths = ProjectPaths::new("gridmenu").ok_or(ConfigLoadError::NoConfigDir)?;
        Ok(paths.config_dir().join("config.toml"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigLoadError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Zero is treated as one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Build the scheme stored under `name`
    pub fn scheme(&self, name: &str) -> Result<InventoryScheme, ConfigLoadError> {
        let config = self
            .schemes
            .get(name)
            .ok_or_else(|| ConfigLoadError::UnknownScheme(name.to_string()))?;

        config
            .to_scheme()
            .map_err(|source| ConfigLoadError::InvalidScheme {
                name: name.to_string(),
                source,
            })
    }
}
