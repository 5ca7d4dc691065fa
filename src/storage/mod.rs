//! # Storage Layer
//!
//! Configuration, persisted settings and message catalogs.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `{config_dir}/config.toml` |
//! | Settings | TOML (`[general]`, `[plugins]`) | `{config_dir}/settings.toml` |
//! | Plugins | YAML, one per file | `{config_dir}/plugins/*.yaml` |
//! | Messages | gettext `.po` | `{config_dir}/languages/{lang}.po` |
//!
//! ## Concurrency Safety
//!
//! - [`SettingsStore`] writes are atomic (temp file + rename) and take an
//!   exclusive file lock (`fs2`)
//! - Config and catalogs are read once at startup
//!
//! ## Key Types
//!
//! - [`Config`] - Application configuration
//! - [`SettingsStore`] - Read/write plugin status and language
//! - [`Catalog`] - Localized notification text

mod config;
mod locale;
mod settings;

pub use config::{Config, ConfigError, MonitorConfig, NotificationConfig, PathsConfig};
pub use locale::{keys, Catalog};
pub use settings::{GeneralSettings, Settings, SettingsError, SettingsStore, DEFAULT_LANGUAGE};
