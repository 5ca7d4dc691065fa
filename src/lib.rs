//! clipboard-master - keeps tracking junk out of copied URLs
//!
//! A background monitor polls the clipboard, and whenever it holds a URL,
//! applies the enabled plugins' find/replace rules, strips the query string
//! and writes the result back. Plugins are YAML files; which of them are
//! enabled is persisted in a settings file.

pub mod cli;
pub mod domain;
pub mod monitor;
pub mod plugin;
pub mod storage;

pub use domain::{is_valid_url, transform, Plugin, Rule, StatusState};
pub use monitor::{Clipboard, Monitor, Notifier, Tick};
pub use plugin::{PluginRegistry, PluginSet};
