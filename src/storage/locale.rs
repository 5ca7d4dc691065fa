//! Localized message catalog
//!
//! Catalogs are gettext-style `.po` files named after the language
//! (`languages/en.po`). Only `msgid`/`msgstr` pairs on single lines are
//! read; comments and other directives are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

/// Message keys used by the application
pub mod keys {
    pub const CLIPBOARD_UPDATED_TITLE: &str = "notifications.clipboardUpdated.title";
    pub const PLUGINS_UPDATING_TITLE: &str = "notifications.pluginsUpdating.title";
    pub const PLUGINS_UPDATING_BODY: &str = "notifications.pluginsUpdating.body";
    pub const PLUGINS_UPDATED_TITLE: &str = "notifications.pluginsUpdated.title";
    pub const PLUGINS_UPDATED_BODY: &str = "notifications.pluginsUpdated.body";
    pub const ERROR_TITLE: &str = "notifications.error.title";
}

/// Key to translated text
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// An empty catalog; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `<dir>/<language>.po`, or an empty catalog if it cannot be read
    pub fn load(dir: &Path, language: &str) -> Self {
        let path = dir.join(format!("{}.po", language));
        match fs::read_to_string(&path) {
            Ok(content) => {
                let catalog = Self::parse(&content);
                debug!(path = %path.display(), messages = catalog.len(), "loaded catalog");
                catalog
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no catalog, using built-in text");
                Self::empty()
            }
        }
    }

    /// Parses `.po` content
    ///
    /// A `msgstr` pairs with the closest preceding `msgid`; a `msgstr` with
    /// no `msgid` before it is ignored.
    pub fn parse(content: &str) -> Self {
        let mut messages = HashMap::new();
        let mut pending: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("msgid") {
                pending = Some(unquote(rest));
            } else if let Some(rest) = line.strip_prefix("msgstr") {
                if let Some(id) = pending.take() {
                    messages.insert(id, unquote(rest));
                }
            }
        }

        Self { messages }
    }

    /// Translated text for `key`, or empty string on miss
    pub fn lookup(&self, key: &str) -> String {
        self.messages.get(key).cloned().unwrap_or_default()
    }

    /// Translated text for `key`, or `fallback` if missing or empty
    pub fn lookup_or(&self, key: &str, fallback: &str) -> String {
        match self.messages.get(key) {
            Some(text) if !text.is_empty() => text.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn unquote(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}
