//! Command line interface for deployment_hook.

mod args;
pub mod commands;
mod output;

pub use args::{Args, PhaseCommand};
pub use commands::execute_command;
pub use output::{OutputManager, command};

use crate::env::EnvConfig;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    execute_command(args, EnvConfig::from_process()).await
}
