//! Command line argument parsing.
//!
//! The workflow runner launches the binary once per phase; everything else
//! comes from `INPUT_*`, `STATE_*` and `GITHUB_*` environment variables.

use crate::github::DEFAULT_API_URL;
use crate::phases::Phase;
use clap::{Parser, Subcommand};

/// Track a GitHub Deployment across the phases of a CI job
#[derive(Parser, Debug)]
#[command(
    name = "deployment_hook",
    version,
    about = "Track a GitHub Deployment across the phases of a CI job",
    long_about = "Create a GitHub Deployment before a job runs, mark it in progress while it runs,
and conclude it with the job's status afterwards.

Usage:
  deployment_hook pre
  deployment_hook main
  deployment_hook post"
)]
pub struct Args {
    /// Phase to execute
    #[command(subcommand)]
    pub phase: PhaseCommand,

    /// Base URL of the GitHub REST API
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

/// One subcommand per hook phase
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCommand {
    /// Create the deployment and mark it pending
    Pre,
    /// Mark the deployment in progress
    Main,
    /// Conclude the deployment with the job's status
    Post,
}

impl From<PhaseCommand> for Phase {
    fn from(command: PhaseCommand) -> Self {
        match command {
            PhaseCommand::Pre => Phase::Pre,
            PhaseCommand::Main => Phase::Main,
            PhaseCommand::Post => Phase::Post,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phase() {
        let args = Args::try_parse_from(["deployment_hook", "post", "--api-url", "http://localhost:1"])
            .unwrap();
        assert_eq!(Phase::from(args.phase), Phase::Post);
        assert_eq!(args.api_url, "http://localhost:1");
    }

    #[test]
    fn test_api_url_before_phase() {
        let args = Args::try_parse_from(["deployment_hook", "--api-url", "http://localhost:2", "main"])
            .unwrap();
        assert_eq!(Phase::from(args.phase), Phase::Main);
        assert_eq!(args.api_url, "http://localhost:2");
    }

    #[test]
    fn test_phase_is_required() {
        assert!(Args::try_parse_from(["deployment_hook"]).is_err());
        assert!(Args::try_parse_from(["deployment_hook", "deploy"]).is_err());
    }
}
