//! Transport for the deployments REST endpoints.

use super::types::{
    CreateDeploymentRequest, DeploymentResponse, DeploymentStatusRequest,
};
use crate::context::Repository;
use crate::error::{DeploymentError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use std::future::Future;

/// Default REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Accept header: the `flash` and `ant-man` previews unlock the extra
/// deployment states and `environment_url`
pub const ACCEPT_MEDIA_TYPES: &str = "application/vnd.github.flash-preview+json, \
    application/vnd.github.ant-man-preview+json, application/vnd.github+json";

/// The two deployment calls the hook makes
pub trait DeploymentApi {
    /// Create a deployment, returning its id
    fn create_deployment(
        &self,
        repo: &Repository,
        request: &CreateDeploymentRequest,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Append a status entry to a deployment
    fn create_deployment_status(
        &self,
        repo: &Repository,
        deployment_id: u64,
        request: &DeploymentStatusRequest,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// reqwest-backed client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubApi {
    client: Client,
    base_url: String,
}

impl GitHubApi {
    /// Create a client for `base_url` authenticating with `token`
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPES));

        let mut authorization = HeaderValue::from_str(&format!("token {token}")).map_err(|_| {
            DeploymentError::InvalidInput {
                name: "token".to_string(),
                reason: "contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("deployment_hook/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(DeploymentError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn deployments_url(&self, repo: &Repository) -> String {
        format!(
            "{}/repos/{}/{}/deployments",
            self.base_url, repo.owner, repo.name
        )
    }
}

/// Status line plus the API's error message, if the body carries one
async fn failure_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value["message"].as_str().map(str::to_string));

    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}"),
    }
}

impl DeploymentApi for GitHubApi {
    async fn create_deployment(
        &self,
        repo: &Repository,
        request: &CreateDeploymentRequest,
    ) -> Result<u64> {
        let url = self.deployments_url(repo);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(DeploymentError::Http)?;

        if !response.status().is_success() {
            return Err(DeploymentError::DeploymentCreate {
                repo: repo.full_name(),
                reason: failure_reason(response).await,
            });
        }

        let deployment: DeploymentResponse =
            response
                .json()
                .await
                .map_err(|e| DeploymentError::DeploymentCreate {
                    repo: repo.full_name(),
                    reason: format!("response did not contain a deployment id: {e}"),
                })?;

        Ok(deployment.id)
    }

    async fn create_deployment_status(
        &self,
        repo: &Repository,
        deployment_id: u64,
        request: &DeploymentStatusRequest,
    ) -> Result<()> {
        let url = format!("{}/{}/statuses", self.deployments_url(repo), deployment_id);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(DeploymentError::Http)?;

        if !response.status().is_success() {
            return Err(DeploymentError::DeploymentStatus {
                deployment_id,
                state: request.state.to_string(),
                reason: failure_reason(response).await,
            });
        }

        Ok(())
    }
}
