//! Deployment Hook - tracks a GitHub Deployment across the phases of a CI job.
//!
//! Phase failures are reported to the runner and turned into a non-zero exit
//! status; they never surface as a panic.

use deployment_hook::cli;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = cli::run().await;
    process::exit(exit_code);
}
