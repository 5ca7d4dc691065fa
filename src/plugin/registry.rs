//! Plugin set loading and the shared registry
//!
//! A [`PluginSet`] is immutable once loaded. The [`PluginRegistry`] holds the
//! current set behind an `Arc` and swaps it wholesale on reload, so readers
//! always see either the old set or the new one, never a mix.

use std::fs;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::definition::{is_definition_file, PluginDefinition};
use super::names::NameMap;
use super::PluginError;
use crate::domain::Plugin;

/// An immutable, loaded set of plugins
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Plugin>,
    names: NameMap,
}

impl PluginSet {
    /// Builds a set from plugins in load order
    ///
    /// On a normalized-name collision the later plugin wins: the earlier one
    /// is dropped and the winner keeps its own load position.
    pub fn from_plugins(plugins: impl IntoIterator<Item = Plugin>) -> Self {
        let mut set = Self::default();
        for plugin in plugins {
            set.push(plugin);
        }
        set
    }

    fn push(&mut self, plugin: Plugin) {
        if let Some(pos) = self
            .plugins
            .iter()
            .position(|p| p.normalized_name() == plugin.normalized_name())
        {
            let replaced = self.plugins.remove(pos);
            debug!(
                plugin = plugin.normalized_name(),
                replaced = replaced.name(),
                "later plugin definition replaces earlier one"
            );
        }
        self.names.insert(plugin.name(), plugin.normalized_name());
        self.plugins.push(plugin);
    }

    /// Loads every plugin definition in `dir`
    ///
    /// Files are read in file-name order. Any unreadable or malformed file
    /// fails the whole load and nothing is returned.
    pub fn load(dir: &Path) -> Result<Self, PluginError> {
        let entries = fs::read_dir(dir).map_err(|source| PluginError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PluginError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && is_definition_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut plugins = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|source| PluginError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let plugin = PluginDefinition::parse(&path, &content)?.into_plugin();
            debug!(
                plugin = plugin.normalized_name(),
                rules = plugin.rules().len(),
                file = %path.display(),
                "loaded plugin"
            );
            plugins.push(plugin);
        }

        Ok(Self::from_plugins(plugins))
    }

    /// Plugins in load order
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Finds a plugin by normalized name
    pub fn get(&self, normalized: &str) -> Option<&Plugin> {
        self.plugins
            .iter()
            .find(|p| p.normalized_name() == normalized)
    }

    /// Resolves user input given as either a display or a normalized name
    pub fn resolve(&self, name: &str) -> Option<&Plugin> {
        let by_display = self.names.normalized_name(name);
        if !by_display.is_empty() {
            return self.get(&by_display);
        }
        self.get(name)
            .or_else(|| self.get(&crate::domain::normalize_name(name)))
    }

    /// Normalized names in load order
    pub fn normalized_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(Plugin::normalized_name)
    }

    /// True if `text` contains any rule's replacement, enabled or not
    pub fn contains_any_rule_output(&self, text: &str) -> bool {
        self.plugins.iter().any(|p| p.contains_output(text))
    }

    /// Display name for a normalized name, or empty string
    pub fn display_name(&self, normalized: &str) -> String {
        self.names.display_name(normalized)
    }

    /// Normalized name for a display name, or empty string
    pub fn normalized_name(&self, display: &str) -> String {
        self.names.normalized_name(display)
    }
}

/// Shared, atomically replaceable plugin set
#[derive(Debug, Default)]
pub struct PluginRegistry {
    current: RwLock<Arc<PluginSet>>,
}

impl PluginRegistry {
    pub fn new(set: PluginSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    /// Returns the set in effect right now
    ///
    /// The returned handle stays valid even if a reload happens meanwhile.
    pub fn current(&self) -> Arc<PluginSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the current set
    pub fn replace(&self, set: PluginSet) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(set);
    }

    /// Loads `dir` and swaps it in on success; on failure the old set stays
    pub fn reload(&self, dir: &Path) -> Result<Arc<PluginSet>, PluginError> {
        let set = PluginSet::load(dir)?;
        info!(count = set.len(), dir = %dir.display(), "plugins reloaded");
        self.replace(set);
        Ok(self.current())
    }
}
