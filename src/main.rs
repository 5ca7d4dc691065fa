//! clipmaster - clipboard URL cleaner

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = clipboard_master::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
