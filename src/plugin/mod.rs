//! # Plugin System
//!
//! Find/replace rule-sets loaded from a directory of YAML files.
//!
//! ## Overview
//!
//! Every `.yaml`/`.yml` file in the plugins directory declares one plugin
//! with a display name and an ordered list of `{find, replace}` rules.
//! Plugins are keyed by their normalized name (lower-case, spaces turned
//! into underscores), which is also the key used in the settings file.
//!
//! ```text
//! plugins/
//! ├── amazon.yaml      # name: Amazon Links
//! ├── tracking.yaml    # name: Tracking
//! └── youtube.yml      # name: YouTube
//! ```
//!
//! ## Loading Policy
//!
//! - Files are loaded in file-name order; that order is the rule order.
//! - One unreadable or malformed file fails the whole load.
//! - Two files with the same normalized name: the later file wins.
//!
//! ## Key Types
//!
//! - [`PluginSet`] - Immutable loaded set with name lookups and the
//!   reprocessing guard
//! - [`PluginRegistry`] - Shared holder that swaps sets atomically on reload
//! - [`PluginDefinition`] - On-disk plugin schema

mod definition;
mod names;
mod registry;

use std::path::PathBuf;

use thiserror::Error;

pub use definition::{is_definition_file, PluginDefinition, PLUGIN_EXTENSIONS};
pub use names::NameMap;
pub use registry::{PluginRegistry, PluginSet};

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Failed to read plugins directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read plugin file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse plugin file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid plugin file {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}
