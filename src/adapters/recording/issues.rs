//! Recording adapter for the `IssueApi` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::issue::IssueChange;
use crate::ports::issues::{IssueApi, IssueFuture};

/// Records tracker interactions while delegating to an inner implementation.
pub struct RecordingIssueApi {
    inner: Box<dyn IssueApi>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueApi {
    /// Wraps `inner`, recording every settled call into `recorder`.
    pub fn new(inner: Box<dyn IssueApi>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FetchIssueInput<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct ApplyChangeInput<'a> {
    key: &'a str,
    change: &'a IssueChange,
}

impl IssueApi for RecordingIssueApi {
    fn fetch_issue(&self, key: &str) -> IssueFuture<'_> {
        let key = key.to_string();

        Box::pin(async move {
            let result = self.inner.fetch_issue(&key).await;
            let input = FetchIssueInput { key: &key };
            record_result(&self.recorder, "issues", "fetch_issue", &input, &result);
            result
        })
    }

    fn apply_change(&self, key: &str, change: &IssueChange) -> IssueFuture<'_> {
        let key = key.to_string();
        let change = change.clone();

        Box::pin(async move {
            let result = self.inner.apply_change(&key, &change).await;
            let input = ApplyChangeInput { key: &key, change: &change };
            record_result(&self.recorder, "issues", "apply_change", &input, &result);
            result
        })
    }
}
