//! Live adapter for the `FailureReporter` port.

use tracing::warn;

use crate::error::IssueError;
use crate::ports::FailureReporter;

/// Logs failures and prints a one-line notification to stderr.
pub struct ConsoleFailureReporter;

impl ConsoleFailureReporter {
    /// Text shown to the user for a failed operation.
    #[must_use]
    pub fn notification(error: &IssueError) -> String {
        format!("Issue update failed: {error}")
    }
}

impl FailureReporter for ConsoleFailureReporter {
    fn report(&self, error: &IssueError) {
        warn!(error = %error, "issue operation failed");
        eprintln!("{}", Self::notification(error));
    }
}
