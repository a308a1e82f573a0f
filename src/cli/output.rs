//! Workflow runner annotations
//!
//! Messages written here use the runner's `::command::` syntax so failures and
//! warnings are surfaced on the job summary, not just in the raw log.

use crate::error::DeploymentError;
use crate::phases::{Phase, PhaseOutcome};

/// Writes runner commands to stdout
#[derive(Debug, Clone, Default)]
pub struct OutputManager;

impl OutputManager {
    /// Create a new output manager
    pub fn new() -> Self {
        Self
    }

    /// Ask the runner to redact `secret` from all later log output
    pub fn mask(&self, secret: &str) {
        if !secret.is_empty() {
            println!("{}", command("add-mask", secret));
        }
    }

    /// Print a warning annotation
    pub fn warn(&self, message: &str) {
        println!("{}", command("warning", message));
    }

    /// Print an error annotation
    pub fn error(&self, message: &str) {
        println!("{}", command("error", message));
    }

    /// Print a plain line
    pub fn println(&self, message: &str) {
        println!("{message}");
    }

    /// Report a phase outcome to the runner
    pub fn report(&self, phase: Phase, outcome: &PhaseOutcome) {
        match outcome {
            PhaseOutcome::Completed {
                deployment_id,
                warnings,
            } => {
                for warning in warnings {
                    self.warn(warning);
                }
                match deployment_id {
                    Some(id) => self.println(&format!("✓ {phase} stage completed for deployment {id}")),
                    None => self.println(&format!("✓ {phase} stage completed")),
                }
            }
            PhaseOutcome::Skipped { reason } => self.warn(reason),
            PhaseOutcome::Failed { error } => self.failure(error),
        }
    }

    fn failure(&self, error: &DeploymentError) {
        self.error(&error.to_string());
        for suggestion in error.recovery_suggestions() {
            self.println(&format!("  {suggestion}"));
        }
    }
}

/// Format a runner command, escaping its data
pub fn command(name: &str, message: &str) -> String {
    format!("::{name}::{}", escape_data(message))
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_escapes_data() {
        assert_eq!(command("warning", "plain"), "::warning::plain");
        assert_eq!(
            command("error", "100% broken\nsecond line"),
            "::error::100%25 broken%0Asecond line"
        );
    }
}
