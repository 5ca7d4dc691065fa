//! Enable/disable state shared between the monitor and the control loop
//!
//! The monitoring flag is an atomic cell; the per-plugin map sits behind a
//! mutex so that every read, write, toggle and snapshot is a single critical
//! section. Entries are never removed: a plugin that disappears on reload
//! keeps its stale entry, which is harmless.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Answers "is this plugin enabled?" for the transformation engine
pub trait PluginSwitch {
    /// Returns the enabled state for a normalized plugin name
    fn is_plugin_enabled(&self, name: &str) -> bool;
}

impl PluginSwitch for HashMap<String, bool> {
    fn is_plugin_enabled(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(true)
    }
}

impl PluginSwitch for BTreeMap<String, bool> {
    fn is_plugin_enabled(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(true)
    }
}

/// Process-wide monitoring flag and per-plugin status map
#[derive(Debug)]
pub struct StatusState {
    monitoring: AtomicBool,
    plugins: Mutex<HashMap<String, bool>>,
}

impl StatusState {
    /// Creates a state with monitoring enabled and an empty status map
    pub fn new() -> Self {
        Self::with_plugins(HashMap::new())
    }

    /// Creates a state seeded from a persisted status map
    pub fn with_plugins(plugins: impl IntoIterator<Item = (String, bool)>) -> Self {
        Self {
            monitoring: AtomicBool::new(true),
            plugins: Mutex::new(plugins.into_iter().collect()),
        }
    }

    fn plugins(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        // Every write is a single insert, so a poisoned map is still consistent.
        self.plugins.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_monitoring_enabled(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }

    pub fn set_monitoring_enabled(&self, enabled: bool) {
        self.monitoring.store(enabled, Ordering::SeqCst);
    }

    /// Flips the monitoring flag and returns the new value
    pub fn toggle_monitoring(&self) -> bool {
        !self.monitoring.fetch_xor(true, Ordering::SeqCst)
    }

    /// Returns the stored value, or true when the plugin has no entry
    pub fn is_plugin_enabled(&self, name: &str) -> bool {
        self.plugins().get(name).copied().unwrap_or(true)
    }

    pub fn set_plugin_enabled(&self, name: &str, enabled: bool) {
        self.plugins().insert(name.to_string(), enabled);
    }

    /// Flips a plugin's state (absent counts as enabled) and returns the new value
    pub fn toggle_plugin(&self, name: &str) -> bool {
        let mut plugins = self.plugins();
        let entry = plugins.entry(name.to_string()).or_insert(true);
        *entry = !*entry;
        *entry
    }

    /// Inserts `true` for every name that has no entry yet
    ///
    /// Returns the number of entries added.
    pub fn reconcile<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut plugins = self.plugins();
        let mut added = 0;
        for name in names {
            if !plugins.contains_key(name) {
                plugins.insert(name.to_string(), true);
                added += 1;
            }
        }
        added
    }

    /// Copies the status map at a single point in time
    pub fn snapshot(&self) -> BTreeMap<String, bool> {
        self.plugins()
            .iter()
            .map(|(name, enabled)| (name.clone(), *enabled))
            .collect()
    }
}

impl Default for StatusState {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginSwitch for StatusState {
    fn is_plugin_enabled(&self, name: &str) -> bool {
        StatusState::is_plugin_enabled(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn monitoring_defaults_to_enabled() {
        let state = StatusState::new();
        assert!(state.is_monitoring_enabled());

        state.set_monitoring_enabled(false);
        assert!(!state.is_monitoring_enabled());
    }

    #[test]
    fn toggle_monitoring_returns_new_value() {
        let state = StatusState::new();
        assert!(!state.toggle_monitoring());
        assert!(state.toggle_monitoring());
        assert!(state.is_monitoring_enabled());
    }

    #[test]
    fn absent_plugin_is_enabled() {
        let state = StatusState::new();
        assert!(state.is_plugin_enabled("never_seen"));
    }

    #[test]
    fn stored_value_wins_over_default() {
        let state = StatusState::with_plugins([("tracking".to_string(), false)]);
        assert!(!state.is_plugin_enabled("tracking"));

        state.set_plugin_enabled("tracking", true);
        assert!(state.is_plugin_enabled("tracking"));
    }

    #[test]
    fn toggle_plugin_starts_from_default() {
        let state = StatusState::new();
        assert!(!state.toggle_plugin("tracking"));
        assert!(state.toggle_plugin("tracking"));
    }

    #[test]
    fn reconcile_only_fills_missing_entries() {
        let state = StatusState::with_plugins([
            ("tracking".to_string(), false),
            ("stale".to_string(), false),
        ]);

        let added = state.reconcile(["tracking", "amazon"]);
        assert_eq!(added, 1);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.get("tracking"), Some(&false));
        assert_eq!(snapshot.get("amazon"), Some(&true));
        // Stale entries are tolerated, not purged
        assert_eq!(snapshot.get("stale"), Some(&false));
    }

    #[test]
    fn map_types_default_to_enabled() {
        let mut map = HashMap::new();
        map.insert("off".to_string(), false);
        assert!(!PluginSwitch::is_plugin_enabled(&map, "off"));
        assert!(PluginSwitch::is_plugin_enabled(&map, "other"));

        let tree: BTreeMap<String, bool> = map.into_iter().collect();
        assert!(!tree.is_plugin_enabled("off"));
        assert!(tree.is_plugin_enabled("other"));
    }

    #[test]
    fn snapshot_reflects_completed_toggles() {
        let state = Arc::new(StatusState::new());
        let names: Vec<String> = (0..8).map(|i| format!("plugin_{}", i)).collect();

        let writer = {
            let state = Arc::clone(&state);
            let names = names.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    for name in &names {
                        state.toggle_plugin(name);
                    }
                }
            })
        };

        // Entries only ever appear, so snapshots grow monotonically
        let mut last_len = 0;
        for _ in 0..500 {
            let snapshot = state.snapshot();
            assert!(snapshot.len() >= last_len);
            assert!(snapshot.len() <= names.len());
            last_len = snapshot.len();
        }

        writer.join().unwrap();

        // An even number of toggles per plugin leaves everything enabled
        let snapshot = state.snapshot();
        assert_eq!(snapshot.len(), names.len());
        assert!(snapshot.values().all(|enabled| *enabled));
    }

    #[test]
    fn monitoring_flag_is_visible_across_threads() {
        let state = Arc::new(StatusState::new());
        let remote = Arc::clone(&state);

        thread::spawn(move || remote.set_monitoring_enabled(false))
            .join()
            .unwrap();

        assert!(!state.is_monitoring_enabled());
    }
}
