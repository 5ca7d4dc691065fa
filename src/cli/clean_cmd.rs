//! One-shot cleaning of a single text

use anyhow::{Context, Result};
use serde::Serialize;

use super::context::{AppContext, PathOverrides};
use super::output::Output;
use crate::domain::{is_valid_url, transform, StatusState};
use crate::plugin::PluginSet;

/// What cleaning one text did, mirroring a single monitor tick
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CleanReport {
    pub input: String,
    pub valid: bool,
    /// Text already contains a rule output, so it was left alone
    pub guarded: bool,
    pub cleaned: String,
    pub changed: bool,
}

pub fn clean(input: &str, plugins: &PluginSet, status: &StatusState) -> CleanReport {
    let valid = is_valid_url(input);
    let guarded = valid && plugins.contains_any_rule_output(input);
    let cleaned = if valid && !guarded {
        transform(input, plugins.plugins(), status)
    } else {
        input.to_string()
    };

    CleanReport {
        input: input.to_string(),
        valid,
        guarded,
        changed: cleaned != input,
        cleaned,
    }
}

pub fn run(output: &Output, overrides: &PathOverrides, text: &str) -> Result<()> {
    let ctx = AppContext::load(overrides)?;
    output.verbose_ctx("clean", &format!("plugins from {}", ctx.plugins_dir.display()));

    let plugins = ctx.load_plugins().context("Failed to load plugins")?;
    let status = ctx.read_status().context("Failed to read settings")?;

    let report = clean(text, &plugins, &status);

    if !report.valid {
        output.verbose_ctx("clean", "not a URL, left unchanged");
    } else if report.guarded {
        output.verbose_ctx("clean", "already contains a rule output, left unchanged");
    }

    if output.is_json() {
        output.data(&report);
    } else {
        println!("{}", report.cleaned);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Plugin, Rule};

    fn plugins() -> PluginSet {
        PluginSet::from_plugins([
            Plugin::new("Tracking", vec![Rule::new("&utm_source=x", "")]),
            Plugin::new("Mobile", vec![Rule::new("m.example.com", "www.example.com")]),
        ])
    }

    #[test]
    fn cleans_a_url() {
        let report = clean(
            "https://example.com/page?id=1&utm_source=x",
            &plugins(),
            &StatusState::new(),
        );
        assert!(report.valid);
        assert!(!report.guarded);
        assert!(report.changed);
        assert_eq!(report.cleaned, "https://example.com/page");
    }

    #[test]
    fn non_url_is_untouched() {
        let report = clean("just some words?", &plugins(), &StatusState::new());
        assert!(!report.valid);
        assert!(!report.changed);
        assert_eq!(report.cleaned, "just some words?");
    }

    #[test]
    fn guarded_text_is_untouched() {
        let status = StatusState::new();
        status.set_plugin_enabled("mobile", false);

        let report = clean("https://www.example.com/a?b=c", &plugins(), &status);
        assert!(report.guarded);
        assert!(!report.changed);
    }

    #[test]
    fn report_serializes_all_fields() {
        let report = clean("https://example.com/", &plugins(), &StatusState::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["input"], "https://example.com/");
        assert_eq!(json["valid"], true);
        assert_eq!(json["guarded"], false);
        assert_eq!(json["changed"], false);
    }
}
