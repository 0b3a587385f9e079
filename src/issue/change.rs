//! Mutations that can be applied to an issue.

use serde::Serialize;

use super::{Issue, IssueType, Severity};

/// A single mutation of an issue, as offered by the tracker web API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueChange {
    /// Apply a workflow transition (`confirm`, `resolve`, `falsepositive`, ...).
    Transition {
        /// Transition name.
        transition: String,
    },
    /// Assign to a user, or unassign when `None`.
    Assign {
        /// Login of the new assignee.
        assignee: Option<String>,
    },
    /// Change the severity.
    SetSeverity {
        /// New severity.
        severity: Severity,
    },
    /// Change the type.
    SetType {
        /// New type.
        issue_type: IssueType,
    },
    /// Replace the tags.
    SetTags {
        /// New tag set.
        tags: Vec<String>,
    },
    /// Add a comment.
    AddComment {
        /// Markdown text.
        text: String,
    },
}

impl IssueChange {
    /// Name of the web API action performing this change.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Transition { .. } => "do_transition",
            Self::Assign { .. } => "assign",
            Self::SetSeverity { .. } => "set_severity",
            Self::SetType { .. } => "set_type",
            Self::SetTags { .. } => "set_tags",
            Self::AddComment { .. } => "add_comment",
        }
    }

    /// Form parameters for the web API action, issue key first.
    #[must_use]
    pub fn form(&self, key: &str) -> Vec<(&'static str, String)> {
        let mut form = vec![("issue", key.to_string())];
        match self {
            Self::Transition { transition } => form.push(("transition", transition.clone())),
            Self::Assign { assignee } => {
                if let Some(login) = assignee {
                    form.push(("assignee", login.clone()));
                }
            }
            Self::SetSeverity { severity } => form.push(("severity", severity.as_str().to_string())),
            Self::SetType { issue_type } => form.push(("type", issue_type.as_str().to_string())),
            Self::SetTags { tags } => form.push(("tags", tags.join(","))),
            Self::AddComment { text } => form.push(("text", text.clone())),
        }
        form
    }

    /// The state the issue is expected to reach once the change succeeds.
    ///
    /// Returns `None` when the outcome is decided by the server (workflow
    /// transitions, comments); such changes can only be applied once the
    /// authoritative response arrives.
    #[must_use]
    pub fn predict(&self, current: &Issue) -> Option<Issue> {
        let mut next = current.clone();
        match self {
            Self::Transition { .. } | Self::AddComment { .. } => return None,
            Self::Assign { assignee } => {
                if next.assignee != *assignee {
                    next.assignee.clone_from(assignee);
                    next.assignee_name = None;
                    next.assignee_avatar = None;
                    next.assignee_active = None;
                }
            }
            Self::SetSeverity { severity } => next.severity = *severity,
            Self::SetType { issue_type } => next.issue_type = *issue_type,
            Self::SetTags { tags } => next.tags.clone_from(tags),
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::fixtures;

    #[test]
    fn transition_and_comment_are_not_predictable() {
        let issue = fixtures::issue("AVq1", "OPEN");
        let transition = IssueChange::Transition { transition: "resolve".into() };
        let comment = IssueChange::AddComment { text: "why?".into() };
        assert!(transition.predict(&issue).is_none());
        assert!(comment.predict(&issue).is_none());
    }

    #[test]
    fn assign_clears_resolved_assignee_fields() {
        let issue = fixtures::issue("AVq1", "OPEN");
        let next = IssueChange::Assign { assignee: Some("bob".into()) }.predict(&issue).unwrap();
        assert_eq!(next.assignee.as_deref(), Some("bob"));
        assert!(next.assignee_name.is_none());
        assert!(next.assignee_avatar.is_none());
    }

    #[test]
    fn reassigning_same_user_keeps_display_fields() {
        let issue = fixtures::issue("AVq1", "OPEN");
        let next = IssueChange::Assign { assignee: Some("alice".into()) }.predict(&issue).unwrap();
        assert_eq!(next, issue);
    }

    #[test]
    fn unassign_predicts_no_assignee() {
        let issue = fixtures::issue("AVq1", "OPEN");
        let next = IssueChange::Assign { assignee: None }.predict(&issue).unwrap();
        assert!(next.assignee.is_none());
        assert!(next.assignee_name.is_none());
    }

    #[test]
    fn severity_type_and_tags_are_predicted() {
        let issue = fixtures::issue("AVq1", "OPEN");

        let next = IssueChange::SetSeverity { severity: Severity::Blocker }.predict(&issue).unwrap();
        assert_eq!(next.severity, Severity::Blocker);

        let next = IssueChange::SetType { issue_type: IssueType::Bug }.predict(&issue).unwrap();
        assert_eq!(next.issue_type, IssueType::Bug);

        let tags = vec!["security".to_string(), "cwe".to_string()];
        let next = IssueChange::SetTags { tags: tags.clone() }.predict(&issue).unwrap();
        assert_eq!(next.tags, tags);
        assert_eq!(next.status, issue.status);
    }

    #[test]
    fn form_carries_issue_key_and_parameters() {
        let change = IssueChange::SetTags { tags: vec!["a".into(), "b".into()] };
        assert_eq!(change.endpoint(), "set_tags");
        assert_eq!(
            change.form("AVq1"),
            vec![("issue", "AVq1".to_string()), ("tags", "a,b".to_string())]
        );

        let unassign = IssueChange::Assign { assignee: None };
        assert_eq!(unassign.form("AVq1"), vec![("issue", "AVq1".to_string())]);

        let severity = IssueChange::SetSeverity { severity: Severity::Minor };
        assert_eq!(severity.form("AVq1")[1], ("severity", "MINOR".to_string()));
    }
}
