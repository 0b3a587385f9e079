//! Mutating commands: `transition`, `assign`, `severity`, `type`, `tags`, `comment`.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::context::ServiceContext;
use crate::error::IssueError;
use crate::issue::{Issue, IssueChange};
use crate::ports::FailureReporter;
use crate::update::{update_issue, Mode};
use crate::view::IssueView;

/// Forwards reports to another reporter and counts them.
struct CountingReporter<'a> {
    inner: &'a dyn FailureReporter,
    failures: AtomicUsize,
}

impl<'a> CountingReporter<'a> {
    fn new(inner: &'a dyn FailureReporter) -> Self {
        Self { inner, failures: AtomicUsize::new(0) }
    }

    fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl FailureReporter for CountingReporter<'_> {
    fn report(&self, error: &IssueError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.inner.report(error);
    }
}

/// Execute a mutating command, printing every state the issue goes through.
///
/// # Errors
///
/// Returns an error string if the issue cannot be loaded or the change fails.
pub async fn run(
    ctx: &ServiceContext,
    key: &str,
    change: &IssueChange,
    deferred: bool,
) -> Result<(), String> {
    let mut view = IssueView::default();
    run_with_view(ctx, key, change, deferred, &mut view).await
}

/// Execute a mutating command, feeding `view` with every state.
///
/// The change is applied optimistically unless `deferred` is set or its
/// outcome cannot be predicted locally.
///
/// # Errors
///
/// Returns an error string if the issue cannot be loaded or the change fails.
pub async fn run_with_view(
    ctx: &ServiceContext,
    key: &str,
    change: &IssueChange,
    deferred: bool,
    view: &mut IssueView,
) -> Result<(), String> {
    let current = ctx
        .issues
        .fetch_issue(key)
        .await
        .map_err(|e| format!("Failed to load issue {key}: {e}"))?
        .into_issue();

    let predicted = if deferred { None } else { change.predict(&current) };
    let before = predicted.is_some().then(|| current.clone());
    let mode = Mode::from_pair(before, predicted).map_err(|e| e.to_string())?;
    info!(issue_key = key, action = change.endpoint(), optimistic = mode.is_optimistic(), "updating issue");

    *view = IssueView::showing(current);
    let reporter = CountingReporter::new(ctx.reporter.as_ref());
    update_issue(
        |issue: &Issue| {
            println!("{issue}");
            view.apply(issue);
        },
        ctx.issues.apply_change(key, change),
        &reporter,
        mode,
    )
    .await;

    if reporter.failures() > 0 {
        return Err(format!("Issue {key} was not updated ({})", change.endpoint()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::issue::fixtures;
    use crate::ports::{IssueApi, IssueFuture};

    /// Serves a fixed current issue and a scripted change outcome.
    struct ScriptedIssueApi {
        change_status: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedIssueApi {
        fn new(change_status: Option<&'static str>) -> Self {
            Self { change_status, calls: Mutex::new(Vec::new()) }
        }
    }

    impl IssueApi for ScriptedIssueApi {
        fn fetch_issue(&self, key: &str) -> IssueFuture<'_> {
            self.calls.lock().unwrap().push(format!("fetch {key}"));
            let response = fixtures::response(key, "OPEN");
            Box::pin(async move { Ok(response) })
        }

        fn apply_change(&self, key: &str, change: &IssueChange) -> IssueFuture<'_> {
            self.calls.lock().unwrap().push(format!("{} {key}", change.endpoint()));
            let result = match self.change_status {
                Some(status) => Ok(fixtures::response(key, status)),
                None => Err(IssueError::Api { status: 400, message: "rejected".into() }),
            };
            Box::pin(async move { result })
        }
    }

    struct SilentReporter;

    impl FailureReporter for SilentReporter {
        fn report(&self, _error: &IssueError) {}
    }

    fn context(api: ScriptedIssueApi) -> ServiceContext {
        ServiceContext::with_ports(Box::new(api), Box::new(SilentReporter))
    }

    #[tokio::test]
    async fn predictable_change_is_applied_optimistically() {
        let ctx = context(ScriptedIssueApi::new(Some("OPEN")));
        let change = IssueChange::SetTags { tags: vec!["security".into()] };
        let mut view = IssueView::default();

        run_with_view(&ctx, "AVq1", &change, false, &mut view).await.unwrap();

        assert_eq!(view.history().len(), 1);
        assert_eq!(view.current().unwrap().tags, ["security"]);
    }

    #[tokio::test]
    async fn transition_waits_for_tracker_state() {
        let ctx = context(ScriptedIssueApi::new(Some("RESOLVED")));
        let change = IssueChange::Transition { transition: "resolve".into() };
        let mut view = IssueView::default();

        run_with_view(&ctx, "AVq1", &change, false, &mut view).await.unwrap();

        assert_eq!(view.history().len(), 1);
        assert_eq!(view.current().unwrap().status, "RESOLVED");
    }

    #[tokio::test]
    async fn deferred_flag_skips_prediction() {
        let ctx = context(ScriptedIssueApi::new(Some("CONFIRMED")));
        let change = IssueChange::SetTags { tags: vec!["security".into()] };
        let mut view = IssueView::default();

        run_with_view(&ctx, "AVq1", &change, true, &mut view).await.unwrap();

        assert_eq!(view.history().len(), 1);
        assert_eq!(view.current().unwrap().status, "CONFIRMED");
        assert_eq!(view.current().unwrap().tags, ["unused"]);
    }

    #[tokio::test]
    async fn failed_change_reverts_and_errors() {
        let ctx = context(ScriptedIssueApi::new(None));
        let change = IssueChange::Assign { assignee: Some("bob".into()) };
        let mut view = IssueView::default();

        let err = run_with_view(&ctx, "AVq1", &change, false, &mut view).await.unwrap_err();

        assert_eq!(err, "Issue AVq1 was not updated (assign)");
        let assignees: Vec<Option<&str>> =
            view.history().iter().map(|issue| issue.assignee.as_deref()).collect();
        assert_eq!(assignees, [Some("bob"), Some("alice")]);
        assert_eq!(view.current().unwrap(), &fixtures::issue("AVq1", "OPEN"));
    }

    #[test]
    fn counting_reporter_forwards_and_counts() {
        let counting = CountingReporter::new(&SilentReporter);
        counting.report(&IssueError::NotFound("AVq1".into()));
        counting.report(&IssueError::NotFound("AVq2".into()));
        assert_eq!(counting.failures(), 2);
    }
}
