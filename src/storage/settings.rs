//! Persisted user settings
//!
//! Settings live in a TOML file with two sections:
//!
//! ```toml
//! [general]
//! language = "en"
//!
//! [plugins]
//! tracking = true
//! amazon_links = false
//! ```
//!
//! Plugin keys are normalized names. Writes go through a temp file and an
//! atomic rename, under an exclusive lock.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Default language selector
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralSettings {
    pub language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Settings file contents
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,

    /// Normalized plugin name to enabled flag
    pub plugins: BTreeMap<String, bool>,
}

impl Settings {
    /// Default settings with every known plugin enabled
    pub fn with_plugins<'a>(known: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            general: GeneralSettings::default(),
            plugins: known.into_iter().map(|name| (name.to_string(), true)).collect(),
        }
    }
}

/// Reads and writes the settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file without creating it; `None` if missing or empty
    pub fn read(&self) -> Result<Option<Settings>, SettingsError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Loads settings, materializing defaults if the file is missing or empty
    ///
    /// Defaults enable every plugin in `known` and are written back to disk.
    pub fn load<'a>(
        &self,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Result<Settings, SettingsError> {
        if let Some(settings) = self.read()? {
            return Ok(settings);
        }

        let settings = Settings::with_plugins(known);
        info!(path = %self.path.display(), "writing default settings");
        self.save(&settings)?;
        Ok(settings)
    }

    /// Writes all settings (full rewrite)
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_error(parent))?;
            }
        }

        let content = toml::to_string_pretty(settings)?;
        let temp_path = self.path.with_extension("toml.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(write_error(&temp_path))?;

            file.lock_exclusive().map_err(write_error(&temp_path))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(content.as_bytes())
                .map_err(write_error(&temp_path))?;
            writer.flush().map_err(write_error(&temp_path))?;
        }

        fs::rename(&temp_path, &self.path).map_err(write_error(&self.path))?;
        debug!(path = %self.path.display(), plugins = settings.plugins.len(), "settings saved");
        Ok(())
    }
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> SettingsError {
    let path = path.to_path_buf();
    move |source| SettingsError::Write { path, source }
}
