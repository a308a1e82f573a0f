//! GitHub deployments integration

mod api;
mod client;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ACCEPT_MEDIA_TYPES, DEFAULT_API_URL, DeploymentApi, GitHubApi};
pub use client::DeploymentClient;
pub use types::{
    CreateDeploymentRequest, DeploymentPayload, DeploymentResponse, DeploymentState,
    DeploymentStatusRequest,
};
