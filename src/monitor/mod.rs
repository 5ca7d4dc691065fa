//! # Runtime
//!
//! The long-running half of clipboard-master.
//!
//! ## Threads
//!
//! | Thread | Owns | Reads | Writes |
//! |--------|------|-------|--------|
//! | Monitor | [`Clipboard`] handle | status, plugin set | clipboard, notifier |
//! | Controller | settings store | control events | status, plugin set, settings |
//! | Console / watcher | nothing | stdin, filesystem | control events |
//!
//! Status lives in a shared [`StatusState`](crate::domain::StatusState) and
//! the plugin set behind a [`PluginRegistry`](crate::plugin::PluginRegistry)
//! swap, so the monitor sees every change on its next tick without locking
//! across a poll.

mod clipboard;
mod control;
mod notifier;
mod poller;
mod watch;

pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use control::{
    announce_loaded, announce_loading, render_status, CommandError, ControlEvent, Controller,
    Response, HELP,
};
pub use notifier::{from_config as notifier_from_config, CommandNotifier, ConsoleNotifier, LogNotifier, Notifier};
pub use poller::{Monitor, Tick, DEFAULT_UPDATED_TITLE};
pub use watch::watch_plugins;
