//! Optimistic issue updates with rollback.
//!
//! [`update_issue`] ties a pending tracker operation to a caller-owned
//! change callback. In [`Mode::Optimistic`] the new state is shown at once
//! and reverted if the operation fails; in [`Mode::Deferred`] nothing is
//! shown until the tracker answers with the authoritative state.

use std::future::Future;

use tracing::debug;

use crate::error::IssueError;
use crate::issue::{Issue, IssueResponse};
use crate::ports::FailureReporter;

/// How an update is reflected in the caller's state.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Show `after` immediately; fall back to `before` if the operation fails.
    Optimistic {
        /// State shown before the change.
        before: Issue,
        /// Expected state once the change succeeds.
        after: Issue,
    },
    /// Wait for the operation and show the state it returns.
    Deferred,
}

impl Mode {
    /// Builds a mode from an optional previous/next pair.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::Config`] when only one of the two states is given.
    pub fn from_pair(before: Option<Issue>, after: Option<Issue>) -> Result<Self, IssueError> {
        match (before, after) {
            (Some(before), Some(after)) => Ok(Self::Optimistic { before, after }),
            (None, None) => Ok(Self::Deferred),
            (Some(_), None) => Err(IssueError::Config(
                "optimistic update needs the new issue state alongside the previous one".into(),
            )),
            (None, Some(_)) => Err(IssueError::Config(
                "optimistic update needs the previous issue state alongside the new one".into(),
            )),
        }
    }

    /// Whether the mode applies the new state before the operation settles.
    #[must_use]
    pub const fn is_optimistic(&self) -> bool {
        matches!(self, Self::Optimistic { .. })
    }
}

/// Reflects a pending issue operation through `on_change`.
///
/// In optimistic mode `on_change(after)` runs before this function returns.
/// The returned future awaits `operation` and then, exactly once:
///
/// - on success in deferred mode, parses the payload and calls `on_change`
///   with the result (optimistic mode keeps the state already shown);
/// - on failure, hands the error to `reporter` and, in optimistic mode,
///   calls `on_change(before)`.
///
/// `on_change` is therefore called at most twice. Panics raised by it are not
/// caught. Dropping the returned future abandons the continuation.
pub fn update_issue<'a, F, Fut>(
    mut on_change: F,
    operation: Fut,
    reporter: &'a dyn FailureReporter,
    mode: Mode,
) -> impl Future<Output = ()> + 'a
where
    F: FnMut(&Issue) + 'a,
    Fut: Future<Output = Result<IssueResponse, IssueError>> + 'a,
{
    // The mode is consumed here; the continuation only sees what to revert to.
    let revert_to = match mode {
        Mode::Optimistic { before, after } => {
            debug!(
                issue_key = %after.key,
                mode = "optimistic",
                outcome = "pending",
                "applying optimistic issue state"
            );
            on_change(&after);
            Some(before)
        }
        Mode::Deferred => None,
    };

    async move {
        match (operation.await, revert_to) {
            (Ok(_), Some(before)) => {
                debug!(
                    issue_key = %before.key,
                    mode = "optimistic",
                    outcome = "accepted",
                    "keeping optimistic issue state"
                );
            }
            (Ok(response), None) => {
                let issue = response.into_issue();
                debug!(
                    issue_key = %issue.key,
                    mode = "deferred",
                    outcome = "accepted",
                    "applying issue state from tracker"
                );
                on_change(&issue);
            }
            (Err(error), Some(before)) => {
                reporter.report(&error);
                debug!(
                    issue_key = %before.key,
                    mode = "optimistic",
                    outcome = "failed",
                    "reverting optimistic issue state"
                );
                on_change(&before);
            }
            (Err(error), None) => {
                reporter.report(&error);
                debug!(
                    mode = "deferred",
                    outcome = "failed",
                    "issue operation failed; nothing to revert"
                );
            }
        }
    }
}
