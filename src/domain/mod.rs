//! Domain models for Clipboard Master
//!
//! Contains the cleaning logic without any I/O concerns: URL classification,
//! plugin rules, enable/disable state and the transformation engine.

mod plugin;
mod status;
mod transform;
mod validate;

pub use plugin::{normalize_name, Plugin, Rule};
pub use status::{PluginSwitch, StatusState};
pub use transform::{strip_query, transform};
pub use validate::is_valid_url;
