//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::context::PathOverrides;
use super::output::{Output, OutputFormat};
use super::{clean_cmd, plugin_cmd, run_cmd};

#[derive(Parser)]
#[command(name = "clipmaster")]
#[command(author, version, about = "Cleans tracking junk out of URLs on your clipboard")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file (default: <config dir>/config.toml)
    #[arg(long, global = true, env = "CLIPMASTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding plugin definitions
    #[arg(long, global = true, env = "CLIPMASTER_PLUGINS_DIR")]
    pub plugins_dir: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true, env = "CLIPMASTER_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory holding `<language>.po` message catalogs
    #[arg(long, global = true, env = "CLIPMASTER_LANGUAGES_DIR")]
    pub languages_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the clipboard and clean URLs until `quit`
    Run {
        /// Don't reload plugins when their files change
        #[arg(long)]
        no_watch: bool,

        /// Start with monitoring switched off
        #[arg(long)]
        paused: bool,
    },

    /// Clean a single URL without touching the clipboard
    Clean {
        /// Text to clean
        text: String,
    },

    /// Manage plugins
    #[command(subcommand)]
    Plugins(plugin_cmd::PluginCommands),
}

impl Cli {
    fn overrides(&self) -> PathOverrides {
        PathOverrides {
            config: self.config.clone(),
            plugins_dir: self.plugins_dir.clone(),
            settings: self.settings.clone(),
            languages_dir: self.languages_dir.clone(),
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be set when embedded; keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = Output::new(cli.format, cli.verbose);
    let overrides = cli.overrides();

    output.verbose("clipboard-master starting");

    match cli.command {
        Commands::Run { no_watch, paused } => {
            output.verbose_ctx("run", &format!("watch plugins: {}, paused: {}", !no_watch, paused));
            let options = run_cmd::RunOptions {
                watch: !no_watch,
                paused,
            };
            run_cmd::run(&output, &overrides, options)?
        }
        Commands::Clean { text } => clean_cmd::run(&output, &overrides, &text)?,
        Commands::Plugins(cmd) => plugin_cmd::run(cmd, &output, &overrides)?,
    }

    Ok(())
}
