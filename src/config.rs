use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{COMMON_TOOLS_LIMIT, Catalog};
use crate::search::SearchFilter;

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How many tools `common` shows when no limit is given
    #[serde(default = "default_common_limit")]
    pub common_limit: usize,
}

fn default_common_limit() -> usize {
    COMMON_TOOLS_LIMIT
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            common_limit: COMMON_TOOLS_LIMIT,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level filter; `RUST_LOG` overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Toolbox configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolboxConfig {
    /// Directory holding categories.json and tools.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,

    #[serde(default)]
    pub search: SearchFilter,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl ToolboxConfig {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .context("Could not determine config directory")
            .map(|d| d.join("toolbox"))
    }

    /// Get the JSON config file path
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Load config from the default location, or return defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or return defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config as pretty JSON, creating the parent directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Catalog::default_data_dir().context("Could not determine data directory"),
        }
    }

    /// Resolved icon directory, `<data_dir>/icons` unless configured
    pub fn icons_dir(&self) -> Result<PathBuf> {
        match &self.icons_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("icons")),
        }
    }

    /// Resolved background image directory, `<data_dir>/images` unless configured
    pub fn images_dir(&self) -> Result<PathBuf> {
        match &self.images_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join("images")),
        }
    }
}
