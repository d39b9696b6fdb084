// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves layout settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// When a pane whose connection ended should be closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CloseOnExitMode {
    /// Never close automatically; the pane keeps showing the final output
    Never,
    /// Close only when the connection ended cleanly
    #[default]
    Graceful,
    /// Close whenever the connection ends, including failures
    Always,
}

/// Settings the pane layout engine is constructed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Thickness in pixels of a single pane border edge
    pub border_size: f32,

    /// Ratio delta applied by one directional resize step
    pub resize_step: f32,

    /// Fraction of the pane given to a newly created pane
    pub default_split_size: f32,

    /// Close policy applied when a pane's connection ends
    pub close_on_exit: CloseOnExitMode,

    /// Optional cap on the number of panes in one tree
    pub max_panes: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            border_size: 2.0,
            resize_step: 0.05,
            default_split_size: 0.5,
            close_on_exit: CloseOnExitMode::default(),
            max_panes: None,
        }
    }
}

impl LayoutConfig {
    /// Combined thickness of the two borders around a separator
    pub fn separator_size(&self) -> f32 {
        2.0 * self.border_size
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pane layout settings
    pub layout: LayoutConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl Config {
    /// Get the default config file path (~/.config/splitmux/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("splitmux").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }
}
