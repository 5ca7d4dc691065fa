//! Plugin definition files
//!
//! Each `.yaml`/`.yml` file in the plugins directory declares one plugin:
//!
//! ```yaml
//! name: Tracking
//! replacements:
//!   - find: "&utm_source=newsletter"
//!     replace: ""
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PluginError;
use crate::domain::{Plugin, Rule};

/// File extensions recognized as plugin definitions
pub const PLUGIN_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// On-disk form of a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDefinition {
    pub name: String,

    #[serde(default)]
    pub replacements: Vec<Rule>,
}

impl PluginDefinition {
    /// Parses a definition from YAML text
    pub fn parse(path: &Path, content: &str) -> Result<Self, PluginError> {
        let definition: Self =
            serde_yaml::from_str(content).map_err(|source| PluginError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if definition.name.trim().is_empty() {
            return Err(PluginError::Invalid {
                path: path.to_path_buf(),
                reason: "plugin name is empty".to_string(),
            });
        }

        Ok(definition)
    }

    pub fn into_plugin(self) -> Plugin {
        Plugin::new(self.name, self.replacements)
    }
}

/// Returns true if the path has a plugin definition extension
pub fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PLUGIN_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_ordered_rules() {
        let yaml = r#"
name: Amazon Links
replacements:
  - find: "/ref=sr_1_1"
    replace: ""
  - find: "smile.amazon"
    replace: "amazon"
"#;
        let def = PluginDefinition::parse(Path::new("amazon.yaml"), yaml).unwrap();
        assert_eq!(def.name, "Amazon Links");
        assert_eq!(def.replacements.len(), 2);
        assert_eq!(def.replacements[1], Rule::new("smile.amazon", "amazon"));

        let plugin = def.into_plugin();
        assert_eq!(plugin.normalized_name(), "amazon_links");
    }

    #[test]
    fn missing_replacements_means_no_rules() {
        let def = PluginDefinition::parse(Path::new("empty.yaml"), "name: Empty\n").unwrap();
        assert!(def.replacements.is_empty());
    }

    #[test]
    fn rejects_missing_name() {
        let err = PluginDefinition::parse(Path::new("bad.yaml"), "replacements: []\n").unwrap_err();
        assert!(matches!(err, PluginError::Parse { .. }));
    }

    #[test]
    fn rejects_blank_name() {
        let err = PluginDefinition::parse(Path::new("blank.yaml"), "name: \"  \"\n").unwrap_err();
        assert!(matches!(err, PluginError::Invalid { .. }));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = PluginDefinition::parse(Path::new("broken.yaml"), "name: [unclosed\n").unwrap_err();
        assert!(matches!(err, PluginError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn recognizes_definition_extensions() {
        assert!(is_definition_file(Path::new("plugins/tracking.yaml")));
        assert!(is_definition_file(Path::new("plugins/tracking.yml")));
        assert!(!is_definition_file(Path::new("plugins/readme.md")));
        assert!(!is_definition_file(Path::new("plugins/yaml")));
    }
}
