//! Resolved configuration shared by all commands

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::StatusState;
use crate::plugin::{PluginError, PluginSet};
use crate::storage::{Catalog, Config, PathsConfig, Settings, SettingsError, SettingsStore};

/// Path flags given on the command line (or via `CLIPMASTER_*`)
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub config: Option<PathBuf>,
    pub plugins_dir: Option<PathBuf>,
    pub settings: Option<PathBuf>,
    pub languages_dir: Option<PathBuf>,
}

impl PathOverrides {
    fn apply(&self, paths: &mut PathsConfig) {
        if let Some(dir) = &self.plugins_dir {
            paths.plugins_dir = Some(dir.clone());
        }
        if let Some(file) = &self.settings {
            paths.settings_file = Some(file.clone());
        }
        if let Some(dir) = &self.languages_dir {
            paths.languages_dir = Some(dir.clone());
        }
    }
}

/// Configuration with every path resolved
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub plugins_dir: PathBuf,
    pub settings_file: PathBuf,
    pub languages_dir: PathBuf,
}

impl AppContext {
    pub fn load(overrides: &PathOverrides) -> Result<Self> {
        let mut config = match &overrides.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .context("Failed to load configuration")?;
        overrides.apply(&mut config.paths);

        Ok(Self {
            plugins_dir: config.plugins_dir()?,
            settings_file: config.settings_file()?,
            languages_dir: config.languages_dir()?,
            config,
        })
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(&self.settings_file)
    }

    pub fn load_plugins(&self) -> Result<PluginSet, PluginError> {
        PluginSet::load(&self.plugins_dir)
    }

    /// Loads settings for `plugins` and builds the matching status state
    ///
    /// Plugins missing from the file are added as enabled and written back.
    pub fn load_status(&self, plugins: &PluginSet) -> Result<(Settings, StatusState), SettingsError> {
        let store = self.settings_store();
        let settings = store.load(plugins.normalized_names())?;
        let status = StatusState::with_plugins(settings.plugins.clone());

        if status.reconcile(plugins.normalized_names()) > 0 {
            store.save(&Settings {
                general: settings.general.clone(),
                plugins: status.snapshot(),
            })?;
        }
        Ok((settings, status))
    }

    /// Status state from the settings file without writing anything
    pub fn read_status(&self) -> Result<StatusState, SettingsError> {
        let plugins = self
            .settings_store()
            .read()?
            .map(|settings| settings.plugins)
            .unwrap_or_default();
        Ok(StatusState::with_plugins(plugins))
    }

    pub fn catalog(&self, language: &str) -> Catalog {
        Catalog::load(&self.languages_dir, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Plugin, Rule};
    use std::fs;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> AppContext {
        let overrides = PathOverrides {
            config: Some(dir.path().join("config.toml")),
            plugins_dir: Some(dir.path().join("plugins")),
            settings: Some(dir.path().join("settings.toml")),
            languages_dir: Some(dir.path().join("languages")),
        };
        AppContext::load(&overrides).unwrap()
    }

    #[test]
    fn overrides_win_over_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[paths]\nplugins_dir = \"/elsewhere\"\n\n[monitor]\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let ctx = context(&dir);
        assert_eq!(ctx.plugins_dir, dir.path().join("plugins"));
        assert_eq!(ctx.config.monitor.poll_interval_ms, 250);
    }

    #[test]
    fn config_paths_used_without_overrides() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "[paths]\nplugins_dir = \"/elsewhere\"\n").unwrap();

        let ctx = AppContext::load(&PathOverrides {
            config: Some(config),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(ctx.plugins_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn load_status_adds_new_plugins() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("settings.toml"),
            "[general]\nlanguage = \"de\"\n\n[plugins]\nold_plugin = false\n",
        )
        .unwrap();
        let ctx = context(&dir);
        let plugins = PluginSet::from_plugins([Plugin::new("Tracking", vec![Rule::new("a", "")])]);

        let (settings, status) = ctx.load_status(&plugins).unwrap();

        assert_eq!(settings.general.language, "de");
        assert!(!status.is_plugin_enabled("old_plugin"));
        assert!(status.is_plugin_enabled("tracking"));

        let saved = fs::read_to_string(dir.path().join("settings.toml")).unwrap();
        assert!(saved.contains("tracking = true"));
        assert!(saved.contains("old_plugin = false"));
        assert!(saved.contains("language = \"de\""));
    }
}
