//! URL transformation engine
//!
//! Applies every enabled plugin's rules in load order, each plugin's rules
//! in declared order, then drops everything from the first `?` onwards.
//! The result depends only on the input text, the plugins and the switch.

use super::plugin::Plugin;
use super::status::PluginSwitch;

/// Cleans a candidate URL
pub fn transform<S>(candidate: &str, plugins: &[Plugin], switch: &S) -> String
where
    S: PluginSwitch + ?Sized,
{
    let mut result = candidate.to_string();

    for plugin in plugins {
        if !switch.is_plugin_enabled(plugin.normalized_name()) {
            continue;
        }
        for rule in plugin.rules() {
            result = rule.apply(&result);
        }
    }

    strip_query(&mut result);
    result
}

/// Truncates `text` at its first `?`
pub fn strip_query(text: &mut String) {
    if let Some(index) = text.find('?') {
        text.truncate(index);
    }
}
