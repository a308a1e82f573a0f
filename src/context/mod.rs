//! Execution context shared by every phase.
//!
//! A context is resolved once per process from inputs, runner metadata and
//! persisted state. After construction it only changes through two controlled
//! operations: recording the created deployment id, and forcing the stage when
//! the main phase absorbs a skipped pre phase.

mod builder;

pub use builder::{create_log_url, get_context, is_production, resolve_ref, resolve_version};

use crate::error::{DeploymentError, Result};
use crate::state::ExecutionStage;

/// Repository coordinates parsed from `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Repository owner (user or organisation)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl Repository {
    /// Parse an `owner/name` identifier
    pub fn parse(full_name: &str) -> Result<Self> {
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(DeploymentError::missing_input(
                "GITHUB_REPOSITORY",
                format!("GITHUB_REPOSITORY '{full_name}' is not of the form owner/name"),
            )),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Target environment of the deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Environment name as shown in the deployments UI
    pub name: String,
    /// Public URL of the deployed environment
    pub url: Option<String>,
    /// Whether the environment is production-class
    pub is_production: bool,
}

impl Environment {
    /// Transient environments are exactly the non-production ones
    pub fn is_transient(&self) -> bool {
        !self.is_production
    }
}

/// Outcome of the wrapped job as reported by the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Job succeeded
    Success,
    /// Job failed
    Failure,
    /// Job was cancelled
    Cancelled,
    /// Job outcome is unknown or superseded
    Inactive,
    /// Job errored
    Error,
    /// Any other reported value, kept verbatim
    Other(String),
}

impl JobStatus {
    /// Parse the `job_status` input
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "success" => JobStatus::Success,
            "failure" => JobStatus::Failure,
            "cancelled" => JobStatus::Cancelled,
            "inactive" => JobStatus::Inactive,
            "error" => JobStatus::Error,
            _ => JobStatus::Other(value.trim().to_string()),
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failure => "failure",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Inactive => "inactive",
            JobStatus::Error => "error",
            JobStatus::Other(value) => value,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a phase needs to talk to the deployments API
#[derive(Clone)]
pub struct ExecutionContext {
    execution_stage: ExecutionStage,
    token: String,
    git_ref: String,
    version: Option<String>,
    required_contexts: Vec<String>,
    job_status: JobStatus,
    log_url: String,
    repo: Repository,
    environment: Environment,
    deployment_id: Option<u64>,
    skip_pre_action: bool,
}

/// Fields for [`ExecutionContext::new`]
#[derive(Debug, Clone)]
pub struct ContextParts {
    /// Stage resolved from persisted flags
    pub execution_stage: ExecutionStage,
    /// API token
    pub token: String,
    /// Ref to deploy
    pub git_ref: String,
    /// Revision identifier carried in the deployment payload
    pub version: Option<String>,
    /// Status checks that must pass before deploying
    pub required_contexts: Vec<String>,
    /// Wrapped job's outcome
    pub job_status: JobStatus,
    /// Link to the workflow run log
    pub log_url: String,
    /// Repository being deployed
    pub repo: Repository,
    /// Target environment
    pub environment: Environment,
    /// Previously created deployment, if any
    pub deployment_id: Option<u64>,
    /// Defer deployment creation to the main phase
    pub skip_pre_action: bool,
}

impl ExecutionContext {
    /// Assemble a context, enforcing the required fields
    pub fn new(parts: ContextParts) -> Result<Self> {
        if parts.token.is_empty() {
            return Err(DeploymentError::missing_input(
                "token",
                "Input required and not supplied: token",
            ));
        }
        if parts.git_ref.is_empty() {
            return Err(DeploymentError::missing_input(
                "ref",
                "No 'ref' input provided and no ref available in the environment",
            ));
        }

        Ok(Self {
            execution_stage: parts.execution_stage,
            token: parts.token,
            git_ref: parts.git_ref,
            version: parts.version,
            required_contexts: parts.required_contexts,
            job_status: parts.job_status,
            log_url: parts.log_url,
            repo: parts.repo,
            environment: parts.environment,
            deployment_id: parts.deployment_id,
            skip_pre_action: parts.skip_pre_action,
        })
    }

    /// Stage this process represents
    pub fn execution_stage(&self) -> ExecutionStage {
        self.execution_stage
    }

    /// API token; never log this
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Ref to deploy
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    /// Revision identifier, distinct from the ref
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Status checks passed through to deployment creation
    pub fn required_contexts(&self) -> &[String] {
        &self.required_contexts
    }

    /// Outcome of the wrapped job
    pub fn job_status(&self) -> &JobStatus {
        &self.job_status
    }

    /// Link to the workflow run log
    pub fn log_url(&self) -> &str {
        &self.log_url
    }

    /// Repository being deployed
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Target environment
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Created deployment, once known
    pub fn deployment_id(&self) -> Option<u64> {
        self.deployment_id
    }

    /// Whether deployment creation is deferred to the main phase
    pub fn skip_pre_action(&self) -> bool {
        self.skip_pre_action
    }

    /// Record the id of a newly created deployment; allowed once per lifecycle
    pub fn record_deployment_id(&mut self, deployment_id: u64) -> Result<()> {
        if let Some(existing) = self.deployment_id {
            return Err(DeploymentError::DeploymentIdAlreadySet { existing });
        }
        self.deployment_id = Some(deployment_id);
        Ok(())
    }

    /// Same context with the stage forced to `stage`
    pub fn with_stage(mut self, stage: ExecutionStage) -> Self {
        self.execution_stage = stage;
        self
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("execution_stage", &self.execution_stage)
            .field("token", &"<redacted>")
            .field("git_ref", &self.git_ref)
            .field("version", &self.version)
            .field("required_contexts", &self.required_contexts)
            .field("job_status", &self.job_status)
            .field("log_url", &self.log_url)
            .field("repo", &self.repo)
            .field("environment", &self.environment)
            .field("deployment_id", &self.deployment_id)
            .field("skip_pre_action", &self.skip_pre_action)
            .finish()
    }
}
