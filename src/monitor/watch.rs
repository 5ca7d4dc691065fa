//! Plugin directory watcher
//!
//! Emits [`ControlEvent::ReloadPlugins`] when a plugin definition file in
//! the watched directory changes.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEvent, Debouncer};
use tracing::{debug, warn};

use super::control::ControlEvent;
use crate::plugin::is_definition_file;

/// Starts watching `dir`; events stop when the returned debouncer is dropped
pub fn watch_plugins(
    dir: &Path,
    debounce: Duration,
    events: Sender<ControlEvent>,
) -> notify::Result<Debouncer<RecommendedWatcher>> {
    let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
        match result {
            Ok(changes) => {
                if !touches_definitions(&changes) {
                    return;
                }
                debug!(changes = changes.len(), "plugin files changed");
                if events.send(ControlEvent::ReloadPlugins).is_err() {
                    debug!("control loop gone, dropping plugin change");
                }
            }
            Err(e) => warn!(error = %e, "plugin watcher error"),
        }
    })?;

    debouncer
        .watcher()
        .watch(dir, RecursiveMode::NonRecursive)?;

    Ok(debouncer)
}

fn touches_definitions(changes: &[DebouncedEvent]) -> bool {
    changes.iter().any(|change| is_definition_file(&change.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_mini::DebouncedEventKind;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn change(path: &str) -> DebouncedEvent {
        DebouncedEvent {
            path: PathBuf::from(path),
            kind: DebouncedEventKind::Any,
        }
    }

    #[test]
    fn only_definition_files_count() {
        assert!(touches_definitions(&[change("/p/notes.txt"), change("/p/amazon.yml")]));
        assert!(!touches_definitions(&[change("/p/notes.txt"), change("/p/.swp")]));
        assert!(!touches_definitions(&[]));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (tx, _rx) = mpsc::channel();
        let result = watch_plugins(&dir.path().join("absent"), Duration::from_millis(50), tx);
        assert!(result.is_err());
    }

    #[test]
    fn writing_a_plugin_requests_reload() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let _watcher = watch_plugins(dir.path(), Duration::from_millis(50), tx).unwrap();

        fs::write(dir.path().join("tracking.yaml"), "name: Tracking\n").unwrap();

        let event = rx.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(event, ControlEvent::ReloadPlugins);
    }
}
