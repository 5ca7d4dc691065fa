//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `run` | Watch the clipboard; console commands toggle monitoring and plugins |
//! | `clean <text>` | Clean one URL without touching the clipboard |
//! | `plugins list` | Show loaded plugins and their status |
//! | `plugins enable/disable <name>` | Persist a plugin switch |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Logs go to stderr. `--verbose` (or `-v`) raises the level to debug and
//! `RUST_LOG` overrides both:
//! ```bash
//! RUST_LOG=clipboard_master=trace clipmaster run
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod clean_cmd;
mod context;
mod output;
mod plugin_cmd;
mod run_cmd;

pub use app::{run, Cli, Commands};
pub use clean_cmd::{clean, CleanReport};
pub use context::{AppContext, PathOverrides};
pub use output::{Output, OutputFormat};
pub use run_cmd::{read_console, RunOptions};
