//! Clipboard polling state machine
//!
//! Each tick samples the clipboard once and decides what to do with it:
//!
//! ```text
//! monitoring off ──────────────────────────────► Disabled    (long wait)
//! read failed / not a URL ─────────────────────► Ignored
//! equals last text we wrote ───────────────────► AlreadyProcessed
//! contains any rule output ────────────────────► LooksCleaned
//! transform(text) == text ─────────────────────► Unchanged
//! transform(text) != text ──► write ─┬─ ok ────► Rewritten   (notify)
//!                                    └─ err ───► WriteFailed
//! ```
//!
//! Status and plugins are re-read on every tick. Failures never end the
//! loop; the monitor runs until the process exits.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::clipboard::Clipboard;
use super::notifier::Notifier;
use crate::domain::{is_valid_url, transform, StatusState};
use crate::plugin::PluginRegistry;
use crate::storage::MonitorConfig;

/// Default notification title when no catalog entry exists
pub const DEFAULT_UPDATED_TITLE: &str = "Clipboard Updated";

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Monitoring is switched off; the clipboard was not read
    Disabled,
    /// Clipboard unreadable or not a URL
    Ignored,
    /// Clipboard still holds the text this monitor last wrote
    AlreadyProcessed,
    /// Clipboard text contains a rule output and is left alone
    LooksCleaned,
    /// Cleaning produced the same text
    Unchanged,
    /// Clipboard was replaced with the cleaned text
    Rewritten(String),
    /// Cleaning changed the text but the write failed
    WriteFailed,
}

/// Polls the clipboard and rewrites URLs
pub struct Monitor<C> {
    clipboard: C,
    registry: Arc<PluginRegistry>,
    status: Arc<StatusState>,
    notifier: Arc<dyn Notifier>,
    title: String,
    poll_interval: Duration,
    disabled_interval: Duration,
    last_processed: Option<String>,
}

impl<C: Clipboard> Monitor<C> {
    pub fn new(
        clipboard: C,
        registry: Arc<PluginRegistry>,
        status: Arc<StatusState>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let intervals = MonitorConfig::default();
        Self {
            clipboard,
            registry,
            status,
            notifier,
            title: DEFAULT_UPDATED_TITLE.to_string(),
            poll_interval: intervals.poll_interval(),
            disabled_interval: intervals.disabled_interval(),
            last_processed: None,
        }
    }

    /// Sets the active and disabled polling intervals
    pub fn with_intervals(mut self, config: &MonitorConfig) -> Self {
        self.poll_interval = config.poll_interval();
        self.disabled_interval = config.disabled_interval();
        self
    }

    /// Sets the title used for "clipboard updated" notifications
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Text most recently written by this monitor
    pub fn last_processed(&self) -> Option<&str> {
        self.last_processed.as_deref()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Runs one poll cycle
    pub fn tick(&mut self) -> Tick {
        if !self.status.is_monitoring_enabled() {
            return Tick::Disabled;
        }

        let text = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "clipboard read skipped");
                return Tick::Ignored;
            }
        };

        if !is_valid_url(&text) {
            return Tick::Ignored;
        }

        if self.last_processed.as_deref() == Some(text.as_str()) {
            return Tick::AlreadyProcessed;
        }

        let plugins = self.registry.current();
        if plugins.contains_any_rule_output(&text) {
            debug!(url = %text, "clipboard already matches a rule output");
            return Tick::LooksCleaned;
        }

        let cleaned = transform(&text, plugins.plugins(), self.status.as_ref());
        if cleaned == text {
            return Tick::Unchanged;
        }

        if let Err(e) = self.clipboard.write_text(&cleaned) {
            warn!(error = %e, "failed to write cleaned URL");
            return Tick::WriteFailed;
        }

        info!(from = %text, to = %cleaned, "clipboard URL cleaned");
        self.last_processed = Some(cleaned.clone());
        self.notifier.notify(&self.title, &cleaned);
        Tick::Rewritten(cleaned)
    }

    /// How long to sleep after a tick
    pub fn delay_after(&self, tick: &Tick) -> Duration {
        match tick {
            Tick::Disabled => self.disabled_interval,
            _ => self.poll_interval,
        }
    }

    /// Polls forever
    pub fn run(mut self) -> ! {
        info!(
            poll_ms = self.poll_interval.as_millis() as u64,
            disabled_ms = self.disabled_interval.as_millis() as u64,
            "clipboard monitor started"
        );
        loop {
            let tick = self.tick();
            thread::sleep(self.delay_after(&tick));
        }
    }
}
