//! Failure sink port.

use crate::error::IssueError;

/// Receives every failed issue operation so it can be shown to the user.
///
/// Reporting is fire-and-forget: implementations must not block and callers
/// never learn whether reporting itself succeeded.
pub trait FailureReporter: Send + Sync {
    /// Reports a failed operation.
    fn report(&self, error: &IssueError);
}
