//! In-memory deployments API for unit tests.

use super::api::DeploymentApi;
use super::types::{CreateDeploymentRequest, DeploymentState, DeploymentStatusRequest};
use crate::context::Repository;
use crate::error::{DeploymentError, Result};
use std::sync::Mutex;

/// One recorded API call
#[derive(Debug, Clone)]
pub(crate) enum ApiCall {
    CreateDeployment {
        repo: String,
        request: CreateDeploymentRequest,
    },
    CreateStatus {
        repo: String,
        deployment_id: u64,
        request: DeploymentStatusRequest,
    },
}

/// Records every call and answers with canned results
#[derive(Debug, Default)]
pub(crate) struct RecordingApi {
    deployment_id: u64,
    fail_create: bool,
    fail_status: bool,
    fail_state: Option<DeploymentState>,
    calls: Mutex<Vec<ApiCall>>,
}

impl RecordingApi {
    pub(crate) fn with_deployment_id(deployment_id: u64) -> Self {
        Self {
            deployment_id,
            ..Self::default()
        }
    }

    pub(crate) fn failing_create() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub(crate) fn failing_status(deployment_id: u64) -> Self {
        Self {
            deployment_id,
            fail_status: true,
            ..Self::default()
        }
    }

    /// Fails only status posts carrying `state`
    pub(crate) fn failing_state(deployment_id: u64, state: DeploymentState) -> Self {
        Self {
            deployment_id,
            fail_state: Some(state),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// States posted to `deployment_id`, in order
    pub(crate) fn status_states(&self, deployment_id: u64) -> Vec<DeploymentState> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::CreateStatus {
                    deployment_id: id,
                    request,
                    ..
                } if id == deployment_id => Some(request.state),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl DeploymentApi for RecordingApi {
    async fn create_deployment(
        &self,
        repo: &Repository,
        request: &CreateDeploymentRequest,
    ) -> Result<u64> {
        self.record(ApiCall::CreateDeployment {
            repo: repo.full_name(),
            request: request.clone(),
        });
        if self.fail_create {
            return Err(DeploymentError::DeploymentCreate {
                repo: repo.full_name(),
                reason: "HTTP 422 Unprocessable Entity".to_string(),
            });
        }
        Ok(self.deployment_id)
    }

    async fn create_deployment_status(
        &self,
        repo: &Repository,
        deployment_id: u64,
        request: &DeploymentStatusRequest,
    ) -> Result<()> {
        self.record(ApiCall::CreateStatus {
            repo: repo.full_name(),
            deployment_id,
            request: request.clone(),
        });
        if self.fail_status || self.fail_state == Some(request.state) {
            return Err(DeploymentError::DeploymentStatus {
                deployment_id,
                state: request.state.to_string(),
                reason: "HTTP 500 Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}
