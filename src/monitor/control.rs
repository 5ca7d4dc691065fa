//! Toggle and reload handling
//!
//! All user actions arrive as [`ControlEvent`]s on one channel and are
//! applied by a single [`Controller`]. Producers (console input, the plugin
//! directory watcher) never touch shared state themselves.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::notifier::Notifier;
use crate::domain::StatusState;
use crate::plugin::{PluginRegistry, PluginSet};
use crate::storage::{keys, Catalog, GeneralSettings, Settings, SettingsStore};

/// A user or filesystem initiated action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SetMonitoring(bool),
    ToggleMonitoring,
    SetPlugin(String, bool),
    TogglePlugin(String),
    ReloadPlugins,
    ShowStatus,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("'{0}' expects no argument")]
    UnexpectedArgument(String),

    #[error("Empty command")]
    Empty,
}

impl FromStr for ControlEvent {
    type Err = CommandError;

    /// Parses a console line such as `disable`, `toggle Tracking` or `reload`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(rest.trim())),
            None => (line, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        let no_arg = |event: ControlEvent| match arg {
            None => Ok(event),
            Some(_) => Err(CommandError::UnexpectedArgument(command.to_string())),
        };

        match (command.to_lowercase().as_str(), arg) {
            ("", _) => Err(CommandError::Empty),
            ("enable" | "on", None) => Ok(ControlEvent::SetMonitoring(true)),
            ("disable" | "off", None) => Ok(ControlEvent::SetMonitoring(false)),
            ("toggle", None) => Ok(ControlEvent::ToggleMonitoring),
            ("enable" | "on", Some(name)) => Ok(ControlEvent::SetPlugin(name.to_string(), true)),
            ("disable" | "off", Some(name)) => {
                Ok(ControlEvent::SetPlugin(name.to_string(), false))
            }
            ("toggle", Some(name)) => Ok(ControlEvent::TogglePlugin(name.to_string())),
            ("reload", _) => no_arg(ControlEvent::ReloadPlugins),
            ("status", _) => no_arg(ControlEvent::ShowStatus),
            ("help" | "?", _) => no_arg(ControlEvent::Help),
            ("quit" | "exit", _) => no_arg(ControlEvent::Quit),
            _ => Err(CommandError::Unknown(command.to_string())),
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Keep running; the message is for the console
    Message(String),
    Quit,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Message(message) => write!(f, "{}", message),
            Response::Quit => write!(f, "Quitting"),
        }
    }
}

pub const HELP: &str = "\
Commands:
  enable | disable | toggle           switch clipboard monitoring
  enable|disable|toggle <plugin>      switch a plugin (display or normalized name)
  reload                              reload plugin files
  status                              show monitoring and plugin state
  quit                                save settings and exit";

/// Applies control events to the shared state
pub struct Controller {
    registry: Arc<PluginRegistry>,
    status: Arc<StatusState>,
    store: SettingsStore,
    general: GeneralSettings,
    notifier: Arc<dyn Notifier>,
    catalog: Catalog,
    plugins_dir: PathBuf,
}

impl Controller {
    pub fn new(
        registry: Arc<PluginRegistry>,
        status: Arc<StatusState>,
        store: SettingsStore,
        notifier: Arc<dyn Notifier>,
        plugins_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            status,
            store,
            general: GeneralSettings::default(),
            notifier,
            catalog: Catalog::empty(),
            plugins_dir: plugins_dir.into(),
        }
    }

    /// Keeps the `[general]` section that was loaded so saves preserve it
    pub fn with_general(mut self, general: GeneralSettings) -> Self {
        self.general = general;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Handles one event
    pub fn handle(&mut self, event: ControlEvent) -> Response {
        match event {
            ControlEvent::SetMonitoring(enabled) => {
                self.status.set_monitoring_enabled(enabled);
                info!(enabled, "monitoring switched");
                Response::Message(monitoring_message(enabled))
            }
            ControlEvent::ToggleMonitoring => {
                let enabled = self.status.toggle_monitoring();
                info!(enabled, "monitoring switched");
                Response::Message(monitoring_message(enabled))
            }
            ControlEvent::SetPlugin(name, enabled) => self.switch_plugin(&name, Some(enabled)),
            ControlEvent::TogglePlugin(name) => self.switch_plugin(&name, None),
            ControlEvent::ReloadPlugins => self.reload(),
            ControlEvent::ShowStatus => Response::Message(self.status_report()),
            ControlEvent::Help => Response::Message(HELP.to_string()),
            ControlEvent::Quit => Response::Quit,
        }
    }

    /// Consumes events until `Quit` or until every sender is gone, then saves
    pub fn run(mut self, events: Receiver<ControlEvent>, mut report: impl FnMut(&Response)) {
        for event in events {
            let response = self.handle(event);
            report(&response);
            if response == Response::Quit {
                break;
            }
        }
        self.persist();
    }

    fn switch_plugin(&mut self, name: &str, target: Option<bool>) -> Response {
        let plugins = self.registry.current();
        let Some(plugin) = plugins.resolve(name) else {
            return Response::Message(format!("Unknown plugin: {}", name));
        };
        let key = plugin.normalized_name();

        let enabled = match target {
            Some(enabled) => {
                self.status.set_plugin_enabled(key, enabled);
                enabled
            }
            None => self.status.toggle_plugin(key),
        };
        info!(plugin = key, enabled, "plugin switched");

        // The toggle stays in effect even if it cannot be saved
        self.persist();

        Response::Message(format!(
            "Plugin '{}' {}",
            plugin.name(),
            if enabled { "enabled" } else { "disabled" }
        ))
    }

    fn reload(&mut self) -> Response {
        announce_loading(self.notifier.as_ref(), &self.catalog);

        match self.registry.reload(&self.plugins_dir) {
            Ok(set) => {
                let added = self.status.reconcile(set.normalized_names());
                if added > 0 {
                    self.persist();
                }
                let body = announce_loaded(self.notifier.as_ref(), &self.catalog, set.len());
                Response::Message(body)
            }
            Err(e) => {
                warn!(error = %e, "plugin reload failed, keeping previous plugins");
                let message = format!("Error loading plugins: {}", e);
                self.report_error(&message);
                Response::Message(message)
            }
        }
    }

    /// Saves the current status map; failures are reported, not returned
    pub fn persist(&self) {
        let settings = Settings {
            general: self.general.clone(),
            plugins: self.status.snapshot(),
        };
        if let Err(e) = self.store.save(&settings) {
            warn!(error = %e, "failed to save settings");
            self.report_error(&format!("Error saving settings: {}", e));
        }
    }

    fn report_error(&self, message: &str) {
        self.notifier
            .notify(&self.catalog.lookup_or(keys::ERROR_TITLE, "Error"), message);
    }

    /// Human-readable monitoring and plugin state
    pub fn status_report(&self) -> String {
        let plugins = self.registry.current();
        render_status(&plugins, &self.status)
    }
}

/// Tells the user that plugin files are being read
pub fn announce_loading(notifier: &dyn Notifier, catalog: &Catalog) {
    notifier.notify(
        &catalog.lookup_or(keys::PLUGINS_UPDATING_TITLE, "Updating plugins"),
        &catalog.lookup_or(keys::PLUGINS_UPDATING_BODY, "Reading plugins..."),
    );
}

/// Tells the user how many plugins were loaded; returns the message body
pub fn announce_loaded(notifier: &dyn Notifier, catalog: &Catalog, count: usize) -> String {
    let body = catalog
        .lookup_or(keys::PLUGINS_UPDATED_BODY, "Found {count} plugins")
        .replace("{count}", &count.to_string());
    notifier.notify(
        &catalog.lookup_or(keys::PLUGINS_UPDATED_TITLE, "Updated list of plugins"),
        &body,
    );
    body
}

fn monitoring_message(enabled: bool) -> String {
    format!("Monitoring {}", if enabled { "enabled" } else { "disabled" })
}

/// Formats monitoring state and one line per loaded plugin
pub fn render_status(plugins: &PluginSet, status: &StatusState) -> String {
    let mut lines = vec![monitoring_message(status.is_monitoring_enabled())];
    if plugins.is_empty() {
        lines.push("No plugins loaded".to_string());
    }
    for plugin in plugins.plugins() {
        lines.push(format!(
            "  [{}] {} ({})",
            if status.is_plugin_enabled(plugin.normalized_name()) { "x" } else { " " },
            plugin.name(),
            plugin.normalized_name()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Plugin, Rule};
    use std::fs;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, String)>>);

    impl Notifier for Recorder {
        fn notify(&self, title: &str, body: &str) {
            self.0.lock().unwrap().push((title.to_string(), body.to_string()));
        }
    }

    struct Fixture {
        dir: TempDir,
        controller: Controller,
        status: Arc<StatusState>,
        registry: Arc<PluginRegistry>,
        recorder: Arc<Recorder>,
    }

    impl Fixture {
        fn settings_text(&self) -> String {
            fs::read_to_string(self.dir.path().join("settings.toml")).unwrap_or_default()
        }
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let plugins_dir = dir.path().join("plugins");
        fs::create_dir(&plugins_dir).unwrap();

        let registry = Arc::new(PluginRegistry::new(PluginSet::from_plugins([Plugin::new(
            "Amazon Links",
            vec![Rule::new("/ref=x", "")],
        )])));
        let status = Arc::new(StatusState::new());
        let recorder = Arc::new(Recorder::default());
        let controller = Controller::new(
            Arc::clone(&registry),
            Arc::clone(&status),
            SettingsStore::new(dir.path().join("settings.toml")),
            recorder.clone(),
            plugins_dir,
        );

        Fixture {
            dir,
            controller,
            status,
            registry,
            recorder,
        }
    }

    #[test]
    fn parses_console_commands() {
        assert_eq!("enable".parse(), Ok(ControlEvent::SetMonitoring(true)));
        assert_eq!("OFF".parse(), Ok(ControlEvent::SetMonitoring(false)));
        assert_eq!("toggle".parse(), Ok(ControlEvent::ToggleMonitoring));
        assert_eq!(
            "disable Amazon Links".parse(),
            Ok(ControlEvent::SetPlugin("Amazon Links".to_string(), false))
        );
        assert_eq!(
            "  toggle   tracking ".parse(),
            Ok(ControlEvent::TogglePlugin("tracking".to_string()))
        );
        assert_eq!("reload".parse(), Ok(ControlEvent::ReloadPlugins));
        assert_eq!("status".parse(), Ok(ControlEvent::ShowStatus));
        assert_eq!("quit".parse(), Ok(ControlEvent::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!("".parse::<ControlEvent>(), Err(CommandError::Empty));
        assert_eq!(
            "explode".parse::<ControlEvent>(),
            Err(CommandError::Unknown("explode".to_string()))
        );
        assert_eq!(
            "quit now".parse::<ControlEvent>(),
            Err(CommandError::UnexpectedArgument("quit".to_string()))
        );
    }

    #[test]
    fn monitoring_toggles_shared_flag() {
        let mut f = fixture();

        let response = f.controller.handle(ControlEvent::ToggleMonitoring);
        assert_eq!(response, Response::Message("Monitoring disabled".to_string()));
        assert!(!f.status.is_monitoring_enabled());

        f.controller.handle(ControlEvent::SetMonitoring(true));
        assert!(f.status.is_monitoring_enabled());
    }

    #[test]
    fn plugin_toggle_accepts_display_name_and_persists() {
        let mut f = fixture();

        let response = f.controller.handle(ControlEvent::TogglePlugin("Amazon Links".to_string()));
        assert_eq!(
            response,
            Response::Message("Plugin 'Amazon Links' disabled".to_string())
        );
        assert!(!f.status.is_plugin_enabled("amazon_links"));
        assert!(f.settings_text().contains("amazon_links = false"));

        f.controller
            .handle(ControlEvent::SetPlugin("amazon_links".to_string(), true));
        assert!(f.status.is_plugin_enabled("amazon_links"));
        assert!(f.settings_text().contains("amazon_links = true"));
    }

    #[test]
    fn unknown_plugin_changes_nothing() {
        let mut f = fixture();
        let response = f.controller.handle(ControlEvent::TogglePlugin("ebay".to_string()));
        assert_eq!(response, Response::Message("Unknown plugin: ebay".to_string()));
        assert!(f.status.snapshot().is_empty());
    }

    #[test]
    fn reload_swaps_set_reconciles_and_notifies() {
        let mut f = fixture();
        fs::write(
            f.dir.path().join("plugins").join("tracking.yaml"),
            "name: Tracking\nreplacements:\n  - find: \"&utm_source=x\"\n    replace: \"\"\n",
        )
        .unwrap();

        let response = f.controller.handle(ControlEvent::ReloadPlugins);
        assert_eq!(response, Response::Message("Found 1 plugins".to_string()));

        let current = f.registry.current();
        assert!(current.get("tracking").is_some());
        assert!(current.get("amazon_links").is_none());
        assert_eq!(f.status.snapshot().get("tracking"), Some(&true));

        let notes = f.recorder.0.lock().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].0, "Updating plugins");
        assert_eq!(notes[1], ("Updated list of plugins".to_string(), "Found 1 plugins".to_string()));
    }

    #[test]
    fn load_announcements_use_catalog_text() {
        let recorder = Recorder::default();
        let catalog = Catalog::parse(
            "msgid \"notifications.pluginsUpdated.title\"\nmsgstr \"Elenco plugin aggiornato\"\n\
             msgid \"notifications.pluginsUpdated.body\"\nmsgstr \"Trovati {count} plugin\"\n",
        );

        announce_loading(&recorder, &catalog);
        let body = announce_loaded(&recorder, &catalog, 3);

        assert_eq!(body, "Trovati 3 plugin");
        let notes = recorder.0.lock().unwrap();
        assert_eq!(
            *notes,
            vec![
                ("Updating plugins".to_string(), "Reading plugins...".to_string()),
                ("Elenco plugin aggiornato".to_string(), "Trovati 3 plugin".to_string()),
            ]
        );
    }

    #[test]
    fn failed_reload_keeps_old_set_and_reports() {
        let mut f = fixture();
        fs::write(f.dir.path().join("plugins").join("bad.yaml"), "name: [oops\n").unwrap();

        let response = f.controller.handle(ControlEvent::ReloadPlugins);
        assert!(response.to_string().starts_with("Error loading plugins"));
        assert!(f.registry.current().get("amazon_links").is_some());

        let notes = f.recorder.0.lock().unwrap();
        assert_eq!(notes.last().unwrap().0, "Error");
    }

    #[test]
    fn save_failure_keeps_toggle_and_notifies() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let registry = Arc::new(PluginRegistry::new(PluginSet::from_plugins([Plugin::new(
            "Tracking",
            vec![],
        )])));
        let status = Arc::new(StatusState::new());
        let recorder = Arc::new(Recorder::default());
        let mut controller = Controller::new(
            registry,
            Arc::clone(&status),
            SettingsStore::new(blocker.join("settings.toml")),
            recorder.clone(),
            dir.path(),
        );

        controller.handle(ControlEvent::SetPlugin("Tracking".to_string(), false));

        assert!(!status.is_plugin_enabled("tracking"));
        let notes = recorder.0.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].1.starts_with("Error saving settings"));
    }

    #[test]
    fn run_stops_on_quit_and_flushes() {
        let f = fixture();
        let (tx, rx) = mpsc::channel();
        tx.send(ControlEvent::SetMonitoring(false)).unwrap();
        tx.send(ControlEvent::Quit).unwrap();
        tx.send(ControlEvent::SetMonitoring(true)).unwrap();

        let mut seen = Vec::new();
        let status = Arc::clone(&f.status);
        f.status.set_plugin_enabled("amazon_links", false);
        let settings_path = f.dir.path().join("settings.toml");
        f.controller.run(rx, |r| seen.push(r.clone()));

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], Response::Quit);
        // Events after Quit are not applied
        assert!(!status.is_monitoring_enabled());
        assert!(fs::read_to_string(settings_path)
            .unwrap()
            .contains("amazon_links = false"));
    }

    #[test]
    fn status_report_lists_plugins() {
        let f = fixture();
        f.status.set_plugin_enabled("amazon_links", false);

        let report = f.controller.status_report();
        assert!(report.contains("Monitoring enabled"));
        assert!(report.contains("[ ] Amazon Links (amazon_links)"));
    }
}
