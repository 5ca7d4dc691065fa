//! Plugin management commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::context::{AppContext, PathOverrides};
use super::output::Output;
use crate::storage::Settings;

#[derive(Subcommand)]
pub enum PluginCommands {
    /// List loaded plugins and whether they are enabled
    List,

    /// Enable a plugin (display or normalized name)
    Enable {
        /// Plugin name
        name: String,
    },

    /// Disable a plugin (display or normalized name)
    Disable {
        /// Plugin name
        name: String,
    },
}

pub fn run(cmd: PluginCommands, output: &Output, overrides: &PathOverrides) -> Result<()> {
    let ctx = AppContext::load(overrides)?;
    output.verbose_ctx("plugins", &format!("directory: {}", ctx.plugins_dir.display()));

    match cmd {
        PluginCommands::List => list_plugins(&ctx, output),
        PluginCommands::Enable { name } => set_enabled(&ctx, output, &name, true),
        PluginCommands::Disable { name } => set_enabled(&ctx, output, &name, false),
    }
}

fn list_plugins(ctx: &AppContext, output: &Output) -> Result<()> {
    let plugins = ctx.load_plugins().context("Failed to load plugins")?;
    let status = ctx.read_status().context("Failed to read settings")?;

    if output.is_json() {
        let items: Vec<_> = plugins
            .plugins()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name(),
                    "normalized_name": p.normalized_name(),
                    "enabled": status.is_plugin_enabled(p.normalized_name()),
                    "rules": p.rules().len(),
                })
            })
            .collect();
        output.data(&items);
    } else if plugins.is_empty() {
        println!("No plugins found in {}", ctx.plugins_dir.display());
    } else {
        println!("{:<8} {:<24} {:<24} {}", "ENABLED", "NAME", "KEY", "RULES");
        println!("{}", "-".repeat(64));
        for plugin in plugins.plugins() {
            let enabled = if status.is_plugin_enabled(plugin.normalized_name()) { "yes" } else { "no" };
            println!(
                "{:<8} {:<24} {:<24} {}",
                enabled,
                plugin.name(),
                plugin.normalized_name(),
                plugin.rules().len()
            );
        }
    }

    Ok(())
}

fn set_enabled(ctx: &AppContext, output: &Output, name: &str, enabled: bool) -> Result<()> {
    let plugins = ctx.load_plugins().context("Failed to load plugins")?;
    let Some(plugin) = plugins.resolve(name) else {
        anyhow::bail!("Plugin not found: {}", name);
    };

    let (settings, status) = ctx.load_status(&plugins).context("Failed to read settings")?;
    status.set_plugin_enabled(plugin.normalized_name(), enabled);

    ctx.settings_store()
        .save(&Settings {
            general: settings.general,
            plugins: status.snapshot(),
        })
        .context("Failed to save settings")?;

    output.success(&format!(
        "Plugin '{}' {}",
        plugin.name(),
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(())
}
