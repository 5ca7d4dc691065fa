//! User notifications
//!
//! Notifications are fire-and-forget: delivery failures are logged and never
//! reach the caller.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use tracing::{info, warn};

use crate::storage::NotificationConfig;

/// Delivers a title/body notification to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, title: &str, body: &str) {
        (**self).notify(title, body)
    }
}

/// Records notifications in the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(title, body, "notification");
    }
}

/// Prints notifications to stderr with a timestamp
///
/// Stdout is left to command output, which may be JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, body: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        eprintln!("[{}] {}: {}", timestamp, title, body);
        info!(title, body, "notification");
    }
}

/// Runs an external program with the title and body as trailing arguments
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    /// Builds from `[program, args...]`; returns None for an empty command
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn build(&self, title: &str, body: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(title)
            .arg(body)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(title, body, program = %self.program, "notification");
        match self.build(title, body).spawn() {
            Ok(mut child) => {
                // Reap in the background so the caller never waits
                thread::spawn(move || {
                    if let Err(e) = child.wait() {
                        warn!(error = %e, "notification command did not finish");
                    }
                });
            }
            Err(e) => warn!(program = %self.program, error = %e, "failed to run notification command"),
        }
    }
}

/// Picks the notifier described by the configuration
pub fn from_config(config: &NotificationConfig) -> Arc<dyn Notifier> {
    if !config.enabled {
        return Arc::new(LogNotifier);
    }
    match CommandNotifier::from_command(&config.command) {
        Some(notifier) => Arc::new(notifier),
        None => Arc::new(ConsoleNotifier),
    }
}
