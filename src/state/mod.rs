//! State tracking for the pre, main and post phases.
//!
//! Each phase runs in its own process, so progress is carried between them by
//! persisted flags. This module derives the current stage from those flags and
//! writes them back once a phase's work has succeeded.

mod manager;
mod stage;
mod store;

pub use manager::StateManager;
pub use stage::{ExecutionStage, StageFlags};
pub use store::{MemoryStateStore, RunnerStateStore, StateStore};

/// State key set once the pre phase has completed
pub const PRE_HAS_RUN: &str = "preHasRun";

/// State key set once the main phase has completed
pub const MAIN_HAS_RUN: &str = "mainHasRun";

/// State key holding the created deployment's id
pub const DEPLOYMENT_ID: &str = "deploymentId";
