//! Persistence of phase progress between hook invocations.

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::state::{DEPLOYMENT_ID, MAIN_HAS_RUN, PRE_HAS_RUN, StateStore};

/// Records completed phases and the deployment id in a [`StateStore`]
#[derive(Debug)]
pub struct StateManager<S> {
    store: S,
}

impl<S: StateStore> StateManager<S> {
    /// Create a state manager over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist the flags for the context's stage, plus its deployment id if set.
    ///
    /// Flags form a ladder: recording `main` or `post` writes `preHasRun` as well.
    /// Only call this after the phase's remote work has succeeded.
    pub fn save_execution_state(&mut self, context: &ExecutionContext) -> Result<()> {
        let flags = context.execution_stage().completed_flags();
        if flags.pre_has_run {
            self.store.save_state(PRE_HAS_RUN, "true")?;
        }
        if flags.main_has_run {
            self.store.save_state(MAIN_HAS_RUN, "true")?;
        }
        if let Some(deployment_id) = context.deployment_id() {
            self.save_deployment_id(deployment_id)?;
        }

        log::debug!(
            "Saved execution state for {} stage",
            context.execution_stage()
        );
        Ok(())
    }

    /// Persist only the deployment id, leaving the stage flags untouched
    pub fn save_deployment_id(&mut self, deployment_id: u64) -> Result<()> {
        self.store
            .save_state(DEPLOYMENT_ID, &deployment_id.to_string())
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the manager, returning the store
    pub fn into_store(self) -> S {
        self.store
    }
}
