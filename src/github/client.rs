//! Deployment lifecycle calls shaped by the execution context.

use super::api::DeploymentApi;
use super::types::{
    CreateDeploymentRequest, DeploymentPayload, DeploymentState, DeploymentStatusRequest,
};
use crate::context::{ExecutionContext, JobStatus};
use crate::error::{DeploymentError, Result};

/// Stateless adapter issuing deployment and status calls for a context.
///
/// No call is retried or deduplicated; duplicate status posts simply extend
/// the deployment's history on the remote side.
#[derive(Debug, Clone)]
pub struct DeploymentClient<A> {
    api: A,
}

impl<A: DeploymentApi> DeploymentClient<A> {
    /// Wrap an API transport
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Borrow the underlying transport
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create a deployment for the context's ref and mark it `pending`.
    ///
    /// The new id is recorded on the context before the `pending` status is
    /// posted, so a caller still sees it if that second call fails.
    pub async fn create_deployment(&self, context: &mut ExecutionContext) -> Result<u64> {
        if let Some(existing) = context.deployment_id() {
            return Err(DeploymentError::DeploymentIdAlreadySet { existing });
        }

        let environment = context.environment();
        let request = CreateDeploymentRequest {
            git_ref: context.git_ref().to_string(),
            environment: Some(environment.name.clone()).filter(|name| !name.is_empty()),
            transient_environment: environment.is_transient(),
            production_environment: environment.is_production,
            required_contexts: context.required_contexts().to_vec(),
            auto_merge: false,
            payload: context.version().map(|version| DeploymentPayload {
                version: version.to_string(),
            }),
        };

        log::info!(
            "Creating new deployment for {} with ref {} and version {}",
            context.repo().full_name(),
            context.git_ref(),
            context.version().unwrap_or("<none>")
        );
        let deployment_id = self.api.create_deployment(context.repo(), &request).await?;
        context.record_deployment_id(deployment_id)?;
        log::info!("Created deployment {deployment_id}");

        log::info!("Setting deployment log url to {}", context.log_url());
        let mut status = DeploymentStatusRequest::new(DeploymentState::Pending);
        status.log_url = Some(context.log_url().to_string());
        self.api
            .create_deployment_status(context.repo(), deployment_id, &status)
            .await?;

        Ok(deployment_id)
    }

    /// Mark the context's deployment `in_progress`
    pub async fn set_deployment_in_progress(&self, context: &ExecutionContext) -> Result<()> {
        let deployment_id = context
            .deployment_id()
            .ok_or(DeploymentError::MissingDeploymentId)?;

        log::info!("Setting deployment status to in_progress");
        let mut status = DeploymentStatusRequest::new(DeploymentState::InProgress);
        status.log_url = Some(context.log_url().to_string());
        self.api
            .create_deployment_status(context.repo(), deployment_id, &status)
            .await
    }

    /// Conclude the context's deployment with the state matching `job_status`.
    ///
    /// `job_status` is passed explicitly so the orchestrator can substitute an
    /// outcome without mutating the context.
    pub async fn set_deployment_ended(
        &self,
        context: &ExecutionContext,
        job_status: &JobStatus,
    ) -> Result<DeploymentState> {
        let deployment_id = context
            .deployment_id()
            .ok_or(DeploymentError::MissingDeploymentId)?;

        let state = DeploymentState::concluding(job_status);
        let mut status = DeploymentStatusRequest::new(state);
        status.environment_url = context.environment().url.clone();

        log::info!("Setting deployment status to {state}");
        self.api
            .create_deployment_status(context.repo(), deployment_id, &status)
            .await?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::sample_context;
    use crate::github::testing::{ApiCall, RecordingApi};
    use crate::state::ExecutionStage;

    #[tokio::test]
    async fn test_create_deployment_then_pending_with_log_url() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let mut context = sample_context(ExecutionStage::Pre);

        let id = client.create_deployment(&mut context).await.unwrap();
        assert_eq!(id, 27);
        assert_eq!(context.deployment_id(), Some(27));

        let calls = client.api().calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            ApiCall::CreateDeployment { repo, request } => {
                assert_eq!(repo, "smartlyio/ci-sla");
                assert_eq!(request.git_ref, "master");
                assert_eq!(request.environment.as_deref(), Some("production"));
                assert!(!request.transient_environment);
                assert!(request.production_environment);
                assert!(!request.auto_merge);
                assert_eq!(
                    request.payload,
                    Some(DeploymentPayload {
                        version: "v1.2.3".to_string()
                    })
                );
            }
            other => panic!("expected deployment creation, got {other:?}"),
        }
        match &calls[1] {
            ApiCall::CreateStatus {
                repo,
                deployment_id,
                request,
            } => {
                assert_eq!(repo, "smartlyio/ci-sla");
                assert_eq!(*deployment_id, 27);
                assert_eq!(request.state, DeploymentState::Pending);
                assert_eq!(request.log_url.as_deref(), Some("https://example.com/logs"));
            }
            other => panic!("expected status update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_refused_when_deployment_exists() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let mut context = sample_context(ExecutionStage::Main);
        context.record_deployment_id(78).unwrap();

        let err = client.create_deployment(&mut context).await.unwrap_err();
        assert!(matches!(err, DeploymentError::DeploymentIdAlreadySet { existing: 78 }));
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_records_nothing() {
        let client = DeploymentClient::new(RecordingApi::failing_create());
        let mut context = sample_context(ExecutionStage::Pre);

        let err = client.create_deployment(&mut context).await.unwrap_err();
        assert!(matches!(err, DeploymentError::DeploymentCreate { .. }));
        assert_eq!(context.deployment_id(), None);
        assert_eq!(client.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_in_progress_requires_deployment_id() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let context = sample_context(ExecutionStage::Main);

        let err = client.set_deployment_in_progress(&context).await.unwrap_err();
        assert!(matches!(err, DeploymentError::MissingDeploymentId));
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_in_progress_status() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let mut context = sample_context(ExecutionStage::Main);
        context.record_deployment_id(78).unwrap();

        client.set_deployment_in_progress(&context).await.unwrap();
        assert_eq!(client.api().status_states(78), vec![DeploymentState::InProgress]);
    }

    #[tokio::test]
    async fn test_ended_maps_job_status() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let mut context = sample_context(ExecutionStage::Post);
        context.record_deployment_id(78).unwrap();

        for (job_status, expected) in [
            (JobStatus::Success, DeploymentState::Success),
            (JobStatus::Failure, DeploymentState::Failure),
            (JobStatus::Cancelled, DeploymentState::Error),
        ] {
            let state = client
                .set_deployment_ended(&context, &job_status)
                .await
                .unwrap();
            assert_eq!(state, expected);
        }

        for call in client.api().calls() {
            if let ApiCall::CreateStatus { request, .. } = call {
                assert_eq!(request.environment_url.as_deref(), Some("https://example.com"));
            }
        }
        assert_eq!(
            client.api().status_states(78),
            vec![
                DeploymentState::Success,
                DeploymentState::Failure,
                DeploymentState::Error
            ]
        );
    }

    #[tokio::test]
    async fn test_ended_requires_deployment_id() {
        let client = DeploymentClient::new(RecordingApi::with_deployment_id(27));
        let context = sample_context(ExecutionStage::Post);

        let err = client
            .set_deployment_ended(&context, &JobStatus::Success)
            .await
            .unwrap_err();
        assert!(matches!(err, DeploymentError::MissingDeploymentId));
    }
}
