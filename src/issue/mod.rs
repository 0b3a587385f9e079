//! Issue domain model and the raw payloads it is parsed from.
//!
//! The tracker answers every issue request with an [`IssueResponse`]: the raw
//! issue plus the components, users and rules it refers to. The parser in
//! [`parse`] joins those into a display-ready [`Issue`].

pub mod change;
pub mod parse;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use change::IssueChange;
pub use parse::parse_issue_from_response;

/// Issue severity as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Must be fixed immediately.
    Blocker,
    /// High impact.
    Critical,
    /// Significant impact.
    Major,
    /// Low impact.
    Minor,
    /// Informational only.
    Info,
}

impl Severity {
    /// Wire value used by the tracker API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocker => "BLOCKER",
            Self::Critical => "CRITICAL",
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue type as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    /// Incorrect behavior.
    Bug,
    /// Security weakness.
    Vulnerability,
    /// Maintainability problem.
    CodeSmell,
}

impl IssueType {
    /// Wire value used by the tracker API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "BUG",
            Self::Vulnerability => "VULNERABILITY",
            Self::CodeSmell => "CODE_SMELL",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character range inside a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    /// First line (1-based).
    pub start_line: u32,
    /// Last line (1-based, inclusive).
    pub end_line: u32,
    /// Offset in the first line.
    pub start_offset: u32,
    /// Offset in the last line.
    pub end_offset: u32,
}

/// A location referenced by an issue flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Component key the location lives in.
    pub component: String,
    /// Highlighted range, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_range: Option<TextRange>,
    /// Message attached to the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// An execution flow as sent by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flow {
    /// Ordered locations of the flow.
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// A comment as sent by the tracker, before the author is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    /// Comment key.
    pub key: String,
    /// Login of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Rendered body.
    #[serde(default)]
    pub html_text: String,
    /// Markdown source.
    #[serde(default)]
    pub markdown: String,
    /// Whether the current user may edit the comment.
    #[serde(default)]
    pub updatable: bool,
    /// Creation timestamp as sent by the tracker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// An issue as sent by the tracker, with relations given by key only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    /// Issue key.
    pub key: String,
    /// Rule key.
    pub rule: String,
    /// Severity.
    pub severity: Severity,
    /// Type.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Workflow status (`OPEN`, `CONFIRMED`, `RESOLVED`, ...).
    pub status: String,
    /// Resolution, once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Issue message.
    #[serde(default)]
    pub message: String,
    /// Component key.
    pub component: String,
    /// Project key.
    pub project: String,
    /// Sub-project key, for multi-module projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_project: Option<String>,
    /// Primary line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Primary range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_range: Option<TextRange>,
    /// Secondary locations and execution flows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,
    /// Assignee login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// SCM author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<RawComment>,
    /// Remediation effort (e.g. `5min`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    /// Workflow transitions available to the current user.
    #[serde(default)]
    pub transitions: Vec<String>,
    /// Actions available to the current user.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// A component (file, directory, module or project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Component key.
    pub key: String,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// Long name (usually the path for files).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Qualifier (`TRK`, `BRC`, `DIR`, `FIL`, `UTS`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// Path relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A tracker user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login.
    pub login: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub active: bool,
}

/// A coding rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule key.
    pub key: String,
    /// Rule name.
    #[serde(default)]
    pub name: String,
    /// Language key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Language display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_name: Option<String>,
}

/// Payload returned by every issue request: the issue and its relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResponse {
    /// The raw issue.
    pub issue: RawIssue,
    /// Components referenced by the issue.
    #[serde(default)]
    pub components: Vec<Component>,
    /// Users referenced by the issue.
    #[serde(default)]
    pub users: Vec<User>,
    /// Rules referenced by the issue.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl IssueResponse {
    /// Parses the payload into a display-ready [`Issue`].
    #[must_use]
    pub fn into_issue(self) -> Issue {
        parse_issue_from_response(self.issue, &self.components, &self.users, &self.rules)
    }
}

/// A comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment key.
    pub key: String,
    /// Login of the author.
    pub login: Option<String>,
    /// Author display name.
    pub author_name: Option<String>,
    /// Author avatar hash.
    pub author_avatar: Option<String>,
    /// Whether the author account is active.
    pub author_active: Option<bool>,
    /// Rendered body.
    pub html_text: String,
    /// Markdown source.
    pub markdown: String,
    /// Whether the current user may edit the comment.
    pub updatable: bool,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

/// A tracked finding, with every relation resolved for display.
///
/// Instances are produced by [`parse_issue_from_response`] and treated as
/// immutable values; a change produces a new `Issue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Issue key.
    pub key: String,
    /// Rule key.
    pub rule: String,
    /// Rule name.
    pub rule_name: Option<String>,
    /// Rule language display name.
    pub rule_lang_name: Option<String>,
    /// Severity.
    pub severity: Severity,
    /// Type.
    pub issue_type: IssueType,
    /// Workflow status.
    pub status: String,
    /// Resolution, once resolved.
    pub resolution: Option<String>,
    /// Issue message.
    pub message: String,
    /// Component key.
    pub component: String,
    /// Component short name.
    pub component_name: Option<String>,
    /// Component long name.
    pub component_long_name: Option<String>,
    /// Component qualifier.
    pub component_qualifier: Option<String>,
    /// Component path.
    pub component_path: Option<String>,
    /// Project key.
    pub project: String,
    /// Project name.
    pub project_name: Option<String>,
    /// Sub-project key.
    pub sub_project: Option<String>,
    /// Sub-project name.
    pub sub_project_name: Option<String>,
    /// Primary line; cleared for closed issues.
    pub line: Option<u32>,
    /// Primary range; cleared for closed issues.
    pub text_range: Option<TextRange>,
    /// Single-location flows, flattened.
    pub secondary_locations: Vec<Location>,
    /// Multi-location execution flows.
    pub flows: Vec<Vec<Location>>,
    /// Assignee login.
    pub assignee: Option<String>,
    /// Assignee display name.
    pub assignee_name: Option<String>,
    /// Assignee avatar hash.
    pub assignee_avatar: Option<String>,
    /// Whether the assignee account is active.
    pub assignee_active: Option<bool>,
    /// SCM author.
    pub author: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
    /// Comments with resolved authors.
    pub comments: Vec<IssueComment>,
    /// Remediation effort.
    pub effort: Option<String>,
    /// Creation timestamp.
    pub creation_date: Option<String>,
    /// Last update timestamp.
    pub update_date: Option<String>,
    /// Workflow transitions available to the current user.
    pub transitions: Vec<String>,
    /// Actions available to the current user.
    pub actions: Vec<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}", self.key, self.status)?;
        if let Some(resolution) = &self.resolution {
            write!(f, "/{resolution}")?;
        }
        write!(f, "] {} {}", self.severity, self.issue_type)?;
        match (&self.assignee_name, &self.assignee) {
            (Some(name), _) => write!(f, " assignee={name}")?,
            (None, Some(login)) => write!(f, " assignee={login}")?,
            (None, None) => write!(f, " unassigned")?,
        }
        if !self.tags.is_empty() {
            write!(f, " tags={}", self.tags.join(","))?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserializes_tracker_json() {
        let json = serde_json::json!({
            "issue": {
                "key": "AVq1",
                "rule": "rust:S1481",
                "severity": "CRITICAL",
                "type": "BUG",
                "status": "OPEN",
                "component": "demo:src/app.rs",
                "project": "demo",
                "line": 3,
                "tags": ["pitfall"]
            },
            "components": [{ "key": "demo:src/app.rs", "name": "app.rs", "longName": "src/app.rs" }],
            "users": [],
            "rules": [{ "key": "rust:S1481", "name": "Unused", "langName": "Rust" }]
        });

        let response: IssueResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.issue.severity, Severity::Critical);
        assert_eq!(response.issue.issue_type, IssueType::Bug);
        assert_eq!(response.issue.line, Some(3));
        assert!(response.issue.comments.is_empty());
        assert_eq!(response.components[0].long_name.as_deref(), Some("src/app.rs"));
        assert_eq!(response.rules[0].lang_name.as_deref(), Some("Rust"));
    }

    #[test]
    fn missing_relation_lists_default_to_empty() {
        let json = serde_json::json!({
            "issue": {
                "key": "AVq2",
                "rule": "rust:S100",
                "severity": "INFO",
                "type": "CODE_SMELL",
                "status": "CONFIRMED",
                "component": "demo",
                "project": "demo"
            }
        });

        let response: IssueResponse = serde_json::from_value(json).unwrap();
        assert!(response.components.is_empty());
        assert!(response.users.is_empty());
        assert!(response.rules.is_empty());
    }

    #[test]
    fn display_summarises_state() {
        let issue = fixtures::issue("AVq1", "OPEN");
        assert_eq!(issue.to_string(), "AVq1 [OPEN] MAJOR CODE_SMELL assignee=Alice tags=unused");
    }

    #[test]
    fn display_includes_resolution_and_unassigned() {
        let mut issue = fixtures::issue("AVq1", "RESOLVED");
        issue.resolution = Some("FIXED".into());
        issue.assignee = None;
        issue.assignee_name = None;
        issue.tags.clear();
        assert_eq!(issue.to_string(), "AVq1 [RESOLVED/FIXED] MAJOR CODE_SMELL unassigned");
    }
}
