//! Plugin and rule models
//!
//! A plugin is a named, ordered list of find/replace rules. Identity is the
//! normalized name (lower-cased, spaces replaced by underscores); the display
//! name is kept for menus and notifications.

use serde::{Deserialize, Serialize};

/// A single find/replace rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub find: String,
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Applies the rule to every non-overlapping occurrence, left to right
    ///
    /// Rules with an empty `find` never match.
    pub fn apply(&self, text: &str) -> String {
        if self.find.is_empty() {
            return text.to_string();
        }
        text.replace(&self.find, &self.replace)
    }
}

/// A loaded plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    name: String,
    normalized_name: String,
    rules: Vec<Rule>,
}

impl Plugin {
    /// Creates a plugin, deriving its normalized name from the display name
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        let name = name.into();
        let normalized_name = normalize_name(&name);
        Self {
            name,
            normalized_name,
            rules,
        }
    }

    /// Display name as declared in the plugin file
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lookup key used by the status map and settings
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Rules in declared order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns true if any rule output occurs in `text`
    ///
    /// Empty replacements are ignored since every text contains them.
    pub fn contains_output(&self, text: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| !rule.replace.is_empty() && text.contains(&rule.replace))
    }
}

/// Converts a display name to its lookup key
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}
