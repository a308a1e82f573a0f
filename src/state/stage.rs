//! Execution stage derivation from persisted phase flags.

use crate::env::EnvConfig;
use crate::state::{MAIN_HAS_RUN, PRE_HAS_RUN};

/// Which of the three hook phases the current process represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecutionStage {
    /// No phase has completed yet
    Pre,
    /// The pre phase has completed
    Main,
    /// The main phase has completed
    Post,
}

/// Phase completion flags written by earlier phases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageFlags {
    /// `preHasRun` was persisted
    pub pre_has_run: bool,
    /// `mainHasRun` was persisted
    pub main_has_run: bool,
}

impl StageFlags {
    /// Read the flags from persisted state; any non-empty value counts as set
    pub fn from_env(env: &EnvConfig) -> Self {
        Self {
            pre_has_run: env.state(PRE_HAS_RUN).is_some(),
            main_has_run: env.state(MAIN_HAS_RUN).is_some(),
        }
    }

    /// Resolve the stage these flags describe
    pub fn stage(self) -> ExecutionStage {
        ExecutionStage::resolve(self)
    }
}

impl ExecutionStage {
    /// Pure transition function from persisted flags to the current stage.
    ///
    /// `mainHasRun` dominates, so progression is monotonic: once main has been
    /// recorded the stage is `Post` regardless of the pre flag.
    pub fn resolve(flags: StageFlags) -> Self {
        match (flags.pre_has_run, flags.main_has_run) {
            (_, true) => ExecutionStage::Post,
            (true, false) => ExecutionStage::Main,
            (false, false) => ExecutionStage::Pre,
        }
    }

    /// Flags that must be persisted once this stage's work has completed
    pub fn completed_flags(self) -> StageFlags {
        match self {
            ExecutionStage::Pre => StageFlags {
                pre_has_run: true,
                main_has_run: false,
            },
            ExecutionStage::Main | ExecutionStage::Post => StageFlags {
                pre_has_run: true,
                main_has_run: true,
            },
        }
    }

    /// Lower-case name used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStage::Pre => "pre",
            ExecutionStage::Main => "main",
            ExecutionStage::Post => "post",
        }
    }
}

impl std::fmt::Display for ExecutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
