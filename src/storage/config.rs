//! Configuration handling for Clipboard Master
//!
//! Configuration is stored in `config.toml` inside the platform config
//! directory (e.g. `~/.config/clipboard-master/config.toml`). A missing file
//! means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Polling intervals for the clipboard monitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between clipboard samples while monitoring is enabled
    pub poll_interval_ms: u64,

    /// Delay between checks while monitoring is disabled
    pub disabled_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            disabled_interval_ms: 1000,
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn disabled_interval(&self) -> Duration {
        Duration::from_millis(self.disabled_interval_ms)
    }
}

/// File locations; unset entries resolve under the config directory
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub plugins_dir: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub languages_dir: Option<PathBuf>,
}

/// Notification delivery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    /// Emit notifications at all
    pub enabled: bool,

    /// External program plus leading arguments, called with title and body
    /// appended (e.g. `["notify-send"]`). Empty prints to the console.
    pub command: Vec<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: Vec::new(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub paths: PathsConfig,
    pub notifications: NotificationConfig,

    /// Reload plugins when the plugins directory changes
    pub watch_plugins: bool,

    /// Debounce delay for plugin directory changes
    pub watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            paths: PathsConfig::default(),
            notifications: NotificationConfig::default(),
            watch_plugins: true,
            watch_debounce_ms: 500,
        }
    }
}

impl Config {
    /// Returns the platform config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "clipboard-master", "clipboard-master")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Loads configuration from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Base directory for relative defaults
    fn base_dir(&self) -> Result<PathBuf, ConfigError> {
        Self::config_dir().ok_or(ConfigError::NoConfigDir)
    }

    /// Directory holding plugin definition files
    pub fn plugins_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.plugins_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.base_dir()?.join("plugins")),
        }
    }

    /// Settings file holding plugin status and language
    pub fn settings_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.settings_file {
            Some(file) => Ok(file.clone()),
            None => Ok(self.base_dir()?.join("settings.toml")),
        }
    }

    /// Directory holding `<language>.po` catalogs
    pub fn languages_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.languages_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.base_dir()?.join("languages")),
        }
    }
}
