//! Resolution of inputs, runner metadata and persisted state into a context.

use super::{ContextParts, Environment, ExecutionContext, JobStatus, Repository};
use crate::env::{EnvConfig, parse_array, to_boolean};
use crate::error::{DeploymentError, Result};
use crate::state::{DEPLOYMENT_ID, StageFlags};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Cluster environments that count as production without an explicit flag
static PRODUCTION_CLUSTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^kube-(prod|intra)\d+$").unwrap_or_else(|e| panic!("invalid pattern: {e}"))
});

/// Subset of the pull request event payload we read
#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    head: PullRequestHead,
}

#[derive(Debug, Deserialize)]
struct PullRequestHead {
    sha: String,
}

/// Link to the log of a workflow run
pub fn create_log_url(server_url: &str, repository: &str, run_id: &str) -> String {
    format!(
        "{}/{}/actions/runs/{}",
        server_url.trim_end_matches('/'),
        repository,
        run_id
    )
}

fn is_pull_request(env: &EnvConfig) -> bool {
    let event = env.get("GITHUB_EVENT_NAME").or_else(|| env.get("GITHUB_EVENT"));
    matches!(
        event.as_deref(),
        Some("pull_request") | Some("pull_request_target")
    )
}

/// Ref to deploy: explicit input, then the PR source branch, then `GITHUB_REF`
pub fn resolve_ref(env: &EnvConfig) -> Result<String> {
    env.input("ref")
        .or_else(|| {
            is_pull_request(env)
                .then(|| env.get("GITHUB_HEAD_REF"))
                .flatten()
        })
        .or_else(|| env.get("GITHUB_REF"))
        .ok_or_else(|| {
            DeploymentError::missing_input(
                "ref",
                "No 'ref' input provided and GITHUB_REF not available in the environment!",
            )
        })
}

/// Revision identifier: explicit input, then the PR head sha, then `GITHUB_SHA`.
///
/// Never fails; an unresolvable version leaves the context without one.
pub fn resolve_version(env: &EnvConfig) -> Option<String> {
    env.input("version")
        .or_else(|| {
            is_pull_request(env)
                .then(|| pull_request_head_sha(env))
                .flatten()
        })
        .or_else(|| env.get("GITHUB_SHA"))
}

fn pull_request_head_sha(env: &EnvConfig) -> Option<String> {
    let event_path = env.get("GITHUB_EVENT_PATH")?;
    let contents = match std::fs::read_to_string(&event_path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("Could not read event file {event_path}: {e}");
            return None;
        }
    };

    match serde_json::from_str::<PullRequestEvent>(&contents) {
        Ok(event) => event
            .pull_request
            .map(|pr| pr.head.sha)
            .filter(|sha| !sha.is_empty()),
        Err(e) => {
            log::warn!("Could not parse event file {event_path}: {e}");
            None
        }
    }
}

/// Production classification: explicit flag, then reserved names
pub fn is_production(environment_name: &str, explicit: Option<&str>) -> bool {
    match explicit {
        Some(flag) => to_boolean(flag),
        None => environment_name == "production" || PRODUCTION_CLUSTER.is_match(environment_name),
    }
}

fn required_env(env: &EnvConfig, key: &str) -> Result<String> {
    env.get(key).ok_or_else(|| {
        DeploymentError::missing_input(key, format!("Unexpectedly missing Github context {key}!"))
    })
}

fn required_input(env: &EnvConfig, name: &str) -> Result<String> {
    env.input(name).ok_or_else(|| {
        DeploymentError::missing_input(name, format!("Input required and not supplied: {name}"))
    })
}

fn persisted_deployment_id(env: &EnvConfig) -> Option<u64> {
    let raw = env.state(DEPLOYMENT_ID)?;
    match raw.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("Ignoring persisted deployment id '{raw}': {e}");
            None
        }
    }
}

/// Build the execution context for the current process.
///
/// Reads only; persisting anything is left to the phase handlers.
pub fn get_context(env: &EnvConfig) -> Result<ExecutionContext> {
    let execution_stage = StageFlags::from_env(env).stage();

    let repository = required_env(env, "GITHUB_REPOSITORY")?;
    let run_id = required_env(env, "GITHUB_RUN_ID")?;
    let git_ref = resolve_ref(env)?;
    let repo = Repository::parse(&repository)?;

    let server_url = env
        .get("GITHUB_SERVER_URL")
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let log_url = create_log_url(&server_url, &repository, &run_id);

    let environment_name = env.input("environment_name").unwrap_or_default();
    let environment = Environment {
        is_production: is_production(
            &environment_name,
            env.input("is_production").as_deref(),
        ),
        url: env.input("environment_url"),
        name: environment_name,
    };

    let token = required_input(env, "token")?;
    let job_status = JobStatus::parse(&required_input(env, "job_status")?);

    let context = ExecutionContext::new(ContextParts {
        execution_stage,
        token,
        git_ref,
        version: resolve_version(env),
        required_contexts: parse_array(&env.input("required_contexts").unwrap_or_default()),
        job_status,
        log_url,
        repo,
        environment,
        deployment_id: persisted_deployment_id(env),
        skip_pre_action: env
            .input("skip_pre_action")
            .is_some_and(|value| to_boolean(&value)),
    })?;

    log::debug!("Resolved context: {context:?}");
    Ok(context)
}
