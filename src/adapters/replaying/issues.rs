//! Replaying adapter for the `IssueApi` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::issue::{IssueChange, IssueResponse};
use crate::ports::issues::{IssueApi, IssueFuture};

/// Serves recorded tracker responses from a cassette.
///
/// Responses are taken in call order, so the cursor advances when a method is
/// called rather than when its future is polled.
pub struct ReplayingIssueApi {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIssueApi {
    /// Creates a replaying issue API over a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self { replayer: Mutex::new(CassetteReplayer::new(cassette)) }
    }
}

impl IssueApi for ReplayingIssueApi {
    fn fetch_issue(&self, _key: &str) -> IssueFuture<'_> {
        let result = next_output(&self.replayer, "issues", "fetch_issue")
            .and_then(|output| replay_result::<IssueResponse>(&output));
        Box::pin(async move { result })
    }

    fn apply_change(&self, _key: &str, _change: &IssueChange) -> IssueFuture<'_> {
        let result = next_output(&self.replayer, "issues", "apply_change")
            .and_then(|output| replay_result::<IssueResponse>(&output));
        Box::pin(async move { result })
    }
}
