//! Caller-side holder of the issue currently shown to the user.

use crate::issue::Issue;

/// The displayed state of one issue and every state it was given.
///
/// An `IssueView` is the natural `on_change` target for
/// [`update_issue`](crate::update::update_issue).
#[derive(Debug, Default)]
pub struct IssueView {
    current: Option<Issue>,
    history: Vec<Issue>,
}

impl IssueView {
    /// Creates a view already showing `issue`.
    #[must_use]
    pub const fn showing(issue: Issue) -> Self {
        Self { current: Some(issue), history: Vec::new() }
    }

    /// Replaces the displayed state.
    pub fn apply(&mut self, issue: &Issue) {
        self.history.push(issue.clone());
        self.current = Some(issue.clone());
    }

    /// The state currently shown.
    #[must_use]
    pub const fn current(&self) -> Option<&Issue> {
        self.current.as_ref()
    }

    /// Every state applied since the view was created, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Issue] {
        &self.history
    }
}
