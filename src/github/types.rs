//! Request and response shapes of the deployments API.

use crate::context::JobStatus;
use serde::{Deserialize, Serialize};

/// State of a deployment status entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    /// Deployment created, work not started
    Pending,
    /// Deployment work underway
    InProgress,
    /// Deployment succeeded
    Success,
    /// Deployment failed
    Failure,
    /// Deployment errored
    Error,
    /// Deployment superseded or outcome unknown
    Inactive,
}

impl DeploymentState {
    /// Final state for a job outcome; anything the API cannot express becomes `Error`
    pub fn concluding(job_status: &JobStatus) -> Self {
        match job_status {
            JobStatus::Success => DeploymentState::Success,
            JobStatus::Failure => DeploymentState::Failure,
            JobStatus::Inactive => DeploymentState::Inactive,
            _ => DeploymentState::Error,
        }
    }

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentState::Pending => "pending",
            DeploymentState::InProgress => "in_progress",
            DeploymentState::Success => "success",
            DeploymentState::Failure => "failure",
            DeploymentState::Error => "error",
            DeploymentState::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /repos/{owner}/{repo}/deployments`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateDeploymentRequest {
    /// Ref to deploy
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Environment name; omitted to let the API apply its default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Whether the environment is short-lived
    pub transient_environment: bool,
    /// Whether the environment is production-class
    pub production_environment: bool,
    /// Status checks that must pass first
    pub required_contexts: Vec<String>,
    /// Always false; the hook never merges the default branch
    pub auto_merge: bool,
    /// Extra data stored with the deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<DeploymentPayload>,
}

/// Payload attached to a created deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPayload {
    /// Revision identifier being deployed
    pub version: String,
}

/// The part of a created deployment we use
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentResponse {
    /// Numeric deployment id
    pub id: u64,
}

/// Body of `POST /repos/{owner}/{repo}/deployments/{deployment_id}/statuses`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentStatusRequest {
    /// New state
    pub state: DeploymentState,
    /// Link to the run log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
    /// Public URL of the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_url: Option<String>,
}

impl DeploymentStatusRequest {
    /// Status update carrying only a state
    pub fn new(state: DeploymentState) -> Self {
        Self {
            state,
            log_url: None,
            environment_url: None,
        }
    }
}
