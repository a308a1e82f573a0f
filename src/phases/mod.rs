//! Phase orchestration for the pre, main and post hook invocations.
//!
//! Each invocation resolves its context, checks that the persisted stage allows
//! the requested phase, performs the remote calls, and only then records its
//! progress. Every error is contained in the returned [`PhaseOutcome`]; the host
//! only ever sees pass or fail.

use crate::context::{ExecutionContext, JobStatus, get_context};
use crate::env::EnvConfig;
use crate::error::{DeploymentError, Result};
use crate::github::{DeploymentApi, DeploymentClient};
use crate::state::{ExecutionStage, StateManager, StateStore};

/// The hook entry point being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Runs before the job's steps
    Pre,
    /// Runs as the job's own step
    Main,
    /// Runs after the job's steps
    Post,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Pre => write!(f, "pre"),
            Phase::Main => write!(f, "main"),
            Phase::Post => write!(f, "post"),
        }
    }
}

/// Result of one phase invocation
#[derive(Debug)]
pub enum PhaseOutcome {
    /// Remote work done and progress persisted
    Completed {
        /// Deployment the phase worked on, if any
        deployment_id: Option<u64>,
        /// Non-fatal conditions worth surfacing to the user
        warnings: Vec<String>,
    },
    /// Nothing to do; not a failure
    Skipped {
        /// Why the phase did nothing
        reason: String,
    },
    /// The phase failed; nothing beyond a known deployment id was persisted
    Failed {
        /// Cause of the failure
        error: DeploymentError,
    },
}

impl PhaseOutcome {
    /// Whether the host should treat the phase as passed
    pub fn is_success(&self) -> bool {
        !matches!(self, PhaseOutcome::Failed { .. })
    }

    /// Process exit code for the host
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Sequences context resolution, API calls and state persistence for a phase
#[derive(Debug)]
pub struct PhaseRunner<A, S> {
    env: EnvConfig,
    client: DeploymentClient<A>,
    state: StateManager<S>,
}

impl<A: DeploymentApi, S: StateStore> PhaseRunner<A, S> {
    /// Create a runner over an environment snapshot, API transport and state store
    pub fn new(env: EnvConfig, api: A, store: S) -> Self {
        Self {
            env,
            client: DeploymentClient::new(api),
            state: StateManager::new(store),
        }
    }

    /// Deployment client used by this runner
    pub fn client(&self) -> &DeploymentClient<A> {
        &self.client
    }

    /// State store used by this runner
    pub fn store(&self) -> &S {
        self.state.store()
    }

    /// Execute `phase`, containing every error in the outcome
    pub async fn run(&mut self, phase: Phase) -> PhaseOutcome {
        log::info!("Executing action {phase} stage");
        let result = match phase {
            Phase::Pre => self.run_pre().await,
            Phase::Main => self.run_main().await,
            Phase::Post => self.run_post().await,
        };

        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                log::error!("{phase} stage failed: {error}");
                PhaseOutcome::Failed { error }
            }
        }
    }

    async fn run_pre(&mut self) -> Result<PhaseOutcome> {
        let mut context = get_context(&self.env)?;
        require_stage(Phase::Pre, &context, &[ExecutionStage::Pre])?;

        if context.skip_pre_action() {
            log::info!("Skipping action pre-run stage; deployment will be created in the main stage");
        } else {
            self.create_deployment(&mut context).await?;
        }

        self.state.save_execution_state(&context)?;
        Ok(PhaseOutcome::Completed {
            deployment_id: context.deployment_id(),
            warnings: Vec::new(),
        })
    }

    async fn run_main(&mut self) -> Result<PhaseOutcome> {
        let mut context = get_context(&self.env)?;

        let created_here = context.skip_pre_action();
        if created_here {
            require_stage(
                Phase::Main,
                &context,
                &[ExecutionStage::Pre, ExecutionStage::Main],
            )?;
            context = context.with_stage(ExecutionStage::Main);
            self.create_deployment(&mut context).await?;
        } else {
            require_stage(Phase::Main, &context, &[ExecutionStage::Main])?;
        }

        if let Err(error) = self.client.set_deployment_in_progress(&context).await {
            if created_here {
                self.preserve_deployment_id(&context);
            }
            return Err(error);
        }
        self.state.save_execution_state(&context)?;
        Ok(PhaseOutcome::Completed {
            deployment_id: context.deployment_id(),
            warnings: Vec::new(),
        })
    }

    async fn run_post(&mut self) -> Result<PhaseOutcome> {
        let context = get_context(&self.env)?;

        let Some(deployment_id) = context.deployment_id() else {
            let reason =
                "The deployment creation step seems to have been skipped. Skipping post-run stage."
                    .to_string();
            log::warn!("{reason}");
            return Ok(PhaseOutcome::Skipped { reason });
        };

        let mut warnings = Vec::new();
        // Main never ran (e.g. skipped by an `if:` condition), so the job's
        // reported status says nothing about this deployment.
        let job_status = if context.execution_stage() == ExecutionStage::Post {
            context.job_status().clone()
        } else {
            let warning =
                "Action main stage not detected to have run. Deploy status set to \"inactive\""
                    .to_string();
            log::warn!("{warning}");
            warnings.push(warning);
            JobStatus::Inactive
        };

        self.client
            .set_deployment_ended(&context, &job_status)
            .await?;
        self.state.save_execution_state(&context)?;
        Ok(PhaseOutcome::Completed {
            deployment_id: Some(deployment_id),
            warnings,
        })
    }

    /// Create the deployment; if creation got as far as an id, keep that id
    /// so the post phase can still conclude it.
    async fn create_deployment(&mut self, context: &mut ExecutionContext) -> Result<u64> {
        match self.client.create_deployment(context).await {
            Ok(deployment_id) => Ok(deployment_id),
            Err(error) => {
                self.preserve_deployment_id(context);
                Err(error)
            }
        }
    }

    /// Persist only the deployment id after a phase failed past creation
    fn preserve_deployment_id(&mut self, context: &ExecutionContext) {
        if let Some(deployment_id) = context.deployment_id()
            && let Err(save_error) = self.state.save_deployment_id(deployment_id)
        {
            log::error!("Could not preserve deployment id {deployment_id}: {save_error}");
        }
    }
}

fn require_stage(
    phase: Phase,
    context: &ExecutionContext,
    allowed: &[ExecutionStage],
) -> Result<()> {
    if allowed.contains(&context.execution_stage()) {
        Ok(())
    } else {
        Err(DeploymentError::StageMismatch {
            phase: phase.to_string(),
            found: context.execution_stage().to_string(),
        })
    }
}
