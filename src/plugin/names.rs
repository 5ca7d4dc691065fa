//! Bidirectional display/normalized name lookup

use std::collections::HashMap;

/// Maps display names to normalized names and back
///
/// Both directions are updated together, so a name is either present in
/// both or in neither.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    by_normalized: HashMap<String, String>,
    by_display: HashMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pair, replacing any previous pair that shares either side
    pub fn insert(&mut self, display: &str, normalized: &str) {
        if let Some(old_display) = self.by_normalized.remove(normalized) {
            self.by_display.remove(&old_display);
        }
        if let Some(old_normalized) = self.by_display.remove(display) {
            self.by_normalized.remove(&old_normalized);
        }
        self.by_normalized
            .insert(normalized.to_string(), display.to_string());
        self.by_display
            .insert(display.to_string(), normalized.to_string());
    }

    /// Display name for a normalized name, or empty string on miss
    pub fn display_name(&self, normalized: &str) -> String {
        self.by_normalized.get(normalized).cloned().unwrap_or_default()
    }

    /// Normalized name for a display name, or empty string on miss
    pub fn normalized_name(&self, display: &str) -> String {
        self.by_display.get(display).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_both_directions() {
        let mut names = NameMap::new();
        names.insert("Amazon Links", "amazon_links");

        assert_eq!(names.display_name("amazon_links"), "Amazon Links");
        assert_eq!(names.normalized_name("Amazon Links"), "amazon_links");
    }

    #[test]
    fn misses_return_empty_strings() {
        let names = NameMap::new();
        assert_eq!(names.display_name("nope"), "");
        assert_eq!(names.normalized_name("Nope"), "");
        assert!(names.is_empty());
    }

    #[test]
    fn colliding_normalized_name_drops_old_display() {
        let mut names = NameMap::new();
        names.insert("Tracking", "tracking");
        names.insert("TRACKING", "tracking");

        assert_eq!(names.len(), 1);
        assert_eq!(names.display_name("tracking"), "TRACKING");
        assert_eq!(names.normalized_name("TRACKING"), "tracking");
        assert_eq!(names.normalized_name("Tracking"), "");
    }
}
