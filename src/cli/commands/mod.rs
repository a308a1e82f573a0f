//! Phase command execution.
//!
//! Wires the real transport and runner state store into a [`PhaseRunner`] and
//! reports the outcome back to the runner.

use crate::cli::{Args, OutputManager};
use crate::env::EnvConfig;
use crate::github::GitHubApi;
use crate::phases::{Phase, PhaseOutcome, PhaseRunner};
use crate::state::RunnerStateStore;

/// Execute the phase named by `args`, returning the process exit code
pub async fn execute_command(args: Args, env: EnvConfig) -> i32 {
    let output = OutputManager::new();
    let phase = Phase::from(args.phase);

    let token = env.input("token").unwrap_or_default();
    output.mask(&token);

    let outcome = match GitHubApi::new(&args.api_url, &token) {
        Ok(api) => {
            let store = RunnerStateStore::from_env(&env);
            let mut runner = PhaseRunner::new(env, api, store);
            runner.run(phase).await
        }
        Err(error) => {
            log::error!("{phase} stage failed: {error}");
            PhaseOutcome::Failed { error }
        }
    };

    output.report(phase, &outcome);
    outcome.exit_code()
}
