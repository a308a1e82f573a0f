//! Error types for deployment hook operations.
//!
//! Each failure category gets its own variant so phase handlers and callers can
//! branch on the kind of failure instead of matching on message text.

use thiserror::Error;

/// Result type alias for deployment hook operations
pub type Result<T> = std::result::Result<T, DeploymentError>;

/// Main error type for all deployment hook operations
#[derive(Error, Debug)]
pub enum DeploymentError {
    /// A required input or environment value is absent
    #[error("{message}")]
    MissingInput {
        /// Name of the missing input or environment variable
        name: String,
        /// Human readable description
        message: String,
    },

    /// An input is present but unusable
    #[error("Invalid '{name}' input: {reason}")]
    InvalidInput {
        /// Name of the offending input
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The persisted stage disagrees with the phase being executed
    #[error("Unexpected execution stage \"{found}\" when executing {phase} stage")]
    StageMismatch {
        /// Phase that was invoked
        phase: String,
        /// Stage resolved from persisted flags
        found: String,
    },

    /// A status update was requested before any deployment was created
    #[error("Deployment ID not available to set deployment status. This is a bug in the action!")]
    MissingDeploymentId,

    /// A deployment was already recorded on this context
    #[error("Deployment {existing} already recorded; refusing to create another")]
    DeploymentIdAlreadySet {
        /// Identifier already present on the context
        existing: u64,
    },

    /// The API rejected a deployment creation request
    #[error("Failed to create deployment for {repo}: {reason}")]
    DeploymentCreate {
        /// Repository in owner/name form
        repo: String,
        /// Reason for the error
        reason: String,
    },

    /// The API rejected a deployment status request
    #[error("Failed to set status '{state}' on deployment {deployment_id}: {reason}")]
    DeploymentStatus {
        /// Deployment the status was posted to
        deployment_id: u64,
        /// Requested state
        state: String,
        /// Reason for the error
        reason: String,
    },

    /// Persisted state could not be written
    #[error("Failed to save state '{key}': {reason}")]
    StateSave {
        /// State key being written
        key: String,
        /// Reason for the error
        reason: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse error category, used by callers that branch on failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input or environment value
    MissingInput,
    /// Input present but malformed
    InvalidInput,
    /// Phase/stage desynchronisation
    StageMismatch,
    /// Status update without a deployment
    MissingDeploymentId,
    /// Remote API rejected a request
    Remote,
    /// Local state or transport failure
    Internal,
}

impl DeploymentError {
    /// Build a missing-input error for the named value
    pub fn missing_input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingInput {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeploymentError::MissingInput { .. } => ErrorKind::MissingInput,
            DeploymentError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DeploymentError::StageMismatch { .. } => ErrorKind::StageMismatch,
            DeploymentError::MissingDeploymentId | DeploymentError::DeploymentIdAlreadySet { .. } => {
                ErrorKind::MissingDeploymentId
            }
            DeploymentError::DeploymentCreate { .. } | DeploymentError::DeploymentStatus { .. } => {
                ErrorKind::Remote
            }
            DeploymentError::StateSave { .. } | DeploymentError::Http(_) => ErrorKind::Internal,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            DeploymentError::MissingInput { name, .. } if name.starts_with("GITHUB_") => vec![
                format!("{name} is provided by the workflow runner; run this hook inside a workflow job"),
            ],
            DeploymentError::MissingInput { name, .. } => vec![
                format!("Pass the '{name}' input in the step's `with:` block"),
            ],
            DeploymentError::InvalidInput { name, .. } => vec![
                format!("Check the value passed as the '{name}' input for stray whitespace or control characters"),
            ],
            DeploymentError::StageMismatch { .. } => vec![
                "Check that the pre, main and post phases run in order within one job".to_string(),
                "A failed deployment creation leaves the stage unsaved; inspect the pre phase log"
                    .to_string(),
            ],
            DeploymentError::DeploymentCreate { .. } | DeploymentError::DeploymentStatus { .. } => {
                vec![
                    "Verify the token has the `deployments: write` permission".to_string(),
                    "Verify the ref exists in the repository".to_string(),
                ]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
