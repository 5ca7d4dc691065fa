//! Foreground monitoring session
//!
//! Starts the clipboard monitor on its own thread, then feeds console
//! commands and plugin directory changes to a single [`Controller`].

use std::fs;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use super::context::{AppContext, PathOverrides};
use super::output::Output;
use crate::domain::StatusState;
use crate::monitor::{
    announce_loaded, announce_loading, notifier_from_config, render_status, watch_plugins,
    CommandError, ControlEvent, Controller, Monitor, Notifier, Response, SystemClipboard,
    DEFAULT_UPDATED_TITLE,
};
use crate::plugin::{PluginRegistry, PluginSet};
use crate::storage::{keys, Settings, DEFAULT_LANGUAGE};

/// Switches for a monitoring session
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Reload plugins when files in the plugins directory change
    pub watch: bool,
    /// Start with monitoring off
    pub paused: bool,
}

pub fn run(output: &Output, overrides: &PathOverrides, options: RunOptions) -> Result<()> {
    let ctx = AppContext::load(overrides)?;
    let notifier = notifier_from_config(&ctx.config.notifications);

    if let Err(e) = fs::create_dir_all(&ctx.plugins_dir) {
        warn!(dir = %ctx.plugins_dir.display(), error = %e, "cannot create plugins directory");
    }

    // The language is needed before the plugins load, so the settings file
    // is peeked at here and read again properly once the plugins are known
    let language = ctx
        .settings_store()
        .read()
        .ok()
        .flatten()
        .map(|settings| settings.general.language)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let catalog = ctx.catalog(&language);
    let error_title = catalog.lookup_or(keys::ERROR_TITLE, "Error");
    let report = |problem: String| {
        warn!("{}", problem);
        notifier.notify(&error_title, &problem);
    };

    // Load failures are reported and the session continues with what loaded
    announce_loading(notifier.as_ref(), &catalog);
    let plugins = match ctx.load_plugins() {
        Ok(plugins) => {
            announce_loaded(notifier.as_ref(), &catalog, plugins.len());
            plugins
        }
        Err(e) => {
            report(format!("Error loading plugins: {}", e));
            PluginSet::default()
        }
    };
    let (settings, status) = ctx.load_status(&plugins).unwrap_or_else(|e| {
        report(format!("Error loading settings: {}", e));
        let settings = Settings::with_plugins(plugins.normalized_names());
        let status = StatusState::with_plugins(settings.plugins.clone());
        (settings, status)
    });

    output.verbose_ctx(
        "run",
        &format!(
            "{} plugins, settings {}, language {}",
            plugins.len(),
            ctx.settings_file.display(),
            settings.general.language
        ),
    );

    let registry = Arc::new(PluginRegistry::new(plugins));
    let status = Arc::new(status);
    if options.paused {
        status.set_monitoring_enabled(false);
    }

    {
        let registry = Arc::clone(&registry);
        let status = Arc::clone(&status);
        let notifier = Arc::clone(&notifier);
        let intervals = ctx.config.monitor.clone();
        let title = catalog.lookup_or(keys::CLIPBOARD_UPDATED_TITLE, DEFAULT_UPDATED_TITLE);

        // The clipboard handle is created on the thread that uses it
        thread::Builder::new()
            .name("clipboard-monitor".to_string())
            .spawn(move || {
                Monitor::new(SystemClipboard::new(), registry, status, notifier)
                    .with_intervals(&intervals)
                    .with_title(title)
                    .run()
            })
            .context("Failed to start clipboard monitor")?;
    }

    let (tx, rx) = mpsc::channel();

    let _watcher = if options.watch && ctx.config.watch_plugins {
        let debounce = Duration::from_millis(ctx.config.watch_debounce_ms);
        match watch_plugins(&ctx.plugins_dir, debounce, tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = %e, "plugin directory not watched");
                None
            }
        }
    } else {
        None
    };

    {
        let events = tx.clone();
        thread::Builder::new()
            .name("console".to_string())
            .spawn(move || {
                read_console(io::stdin().lock(), &events, |e| eprintln!("{}", e));
            })
            .context("Failed to start console reader")?;
    }

    if !output.is_json() {
        println!("{}", render_status(&registry.current(), &status));
        println!("Type 'help' for commands.");
    }

    let controller = Controller::new(
        registry,
        status,
        ctx.settings_store(),
        notifier,
        ctx.plugins_dir.clone(),
    )
    .with_general(settings.general)
    .with_catalog(catalog);

    // `tx` stays alive so closing stdin does not end the session
    controller.run(rx, |response| match response {
        Response::Message(message) => output.success(message),
        Response::Quit => output.success("Exiting"),
    });
    drop(tx);

    Ok(())
}

/// Turns console lines into events until EOF or until the receiver is gone
///
/// Blank lines are skipped; unparsable lines go to `on_error`. Bytes that
/// are not UTF-8 are replaced, so a garbled line is reported, not fatal.
pub fn read_console(
    mut input: impl BufRead,
    events: &Sender<ControlEvent>,
    mut on_error: impl FnMut(CommandError),
) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "console input closed");
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ControlEvent>() {
            Ok(event) => {
                let quit = event == ControlEvent::Quit;
                if events.send(event).is_err() || quit {
                    break;
                }
            }
            Err(e) => on_error(e),
        }
    }
}
