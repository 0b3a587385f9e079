//! Issue tracker port for reading and mutating issues.

use std::future::Future;
use std::pin::Pin;

use crate::error::IssueError;
use crate::issue::{IssueChange, IssueResponse};

/// Boxed future type alias used by [`IssueApi`] to keep the trait dyn-compatible.
pub type IssueFuture<'a> =
    Pin<Box<dyn Future<Output = Result<IssueResponse, IssueError>> + Send + 'a>>;

/// Reads and mutates issues in a remote tracker.
///
/// Every call settles exactly once with the issue payload or an error. The
/// futures are at-most-once: callers never poll them again after settlement
/// and adapters never resubmit a request.
pub trait IssueApi: Send + Sync {
    /// Fetches the current state of an issue together with its relations.
    ///
    /// # Errors
    ///
    /// Settles with an error if the issue does not exist or the request fails.
    fn fetch_issue(&self, key: &str) -> IssueFuture<'_>;

    /// Applies a change to an issue and returns the updated payload.
    ///
    /// # Errors
    ///
    /// Settles with an error if the tracker rejects the change or the request fails.
    fn apply_change(&self, key: &str, change: &IssueChange) -> IssueFuture<'_>;
}
