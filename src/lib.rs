//! # Deployment Hook
//!
//! Tracks a GitHub Deployment across the three phases of a CI job.
//!
//! The workflow runner launches this crate's binary three times per job, each
//! as a fresh process. Progress between those invocations is carried by
//! persisted state flags, from which every phase derives where it stands.
//!
//! ## Phases
//!
//! - **pre**: create the deployment and mark it `pending` with a link to the run log
//! - **main**: mark the deployment `in_progress`
//! - **post**: conclude the deployment with the job's status
//!
//! ## Usage
//!
//! ```bash
//! deployment_hook pre
//! deployment_hook main
//! deployment_hook post
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod context;
pub mod env;
pub mod error;
pub mod github;
pub mod phases;
pub mod state;

// Re-export main types for public API
pub use context::{Environment, ExecutionContext, JobStatus, Repository, get_context};
pub use env::EnvConfig;
pub use error::{DeploymentError, ErrorKind, Result};
pub use github::{DeploymentApi, DeploymentClient, DeploymentState, GitHubApi};
pub use phases::{Phase, PhaseOutcome, PhaseRunner};
pub use state::{ExecutionStage, MemoryStateStore, RunnerStateStore, StateManager, StateStore};
