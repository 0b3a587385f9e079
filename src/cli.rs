//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::issue::{IssueChange, IssueType, Severity};

/// Top-level CLI parser for `issuesync`.
#[derive(Debug, Parser)]
#[command(name = "issuesync", version, about = "Update tracker issues and follow their state")]
pub struct Cli {
    /// Wait for the tracker before showing the new state.
    #[arg(long, global = true)]
    pub deferred: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show an issue.
    Show {
        /// Issue key.
        key: String,
    },
    /// Apply a workflow transition (confirm, resolve, falsepositive, wontfix, reopen, ...).
    Transition {
        /// Issue key.
        key: String,
        /// Transition name.
        transition: String,
    },
    /// Assign an issue, or unassign it when no login is given.
    Assign {
        /// Issue key.
        key: String,
        /// Login of the new assignee.
        login: Option<String>,
    },
    /// Change the severity of an issue.
    Severity {
        /// Issue key.
        key: String,
        /// New severity.
        #[arg(value_enum)]
        severity: Severity,
    },
    /// Change the type of an issue.
    Type {
        /// Issue key.
        key: String,
        /// New type.
        #[arg(value_enum)]
        issue_type: IssueType,
    },
    /// Replace the tags of an issue.
    Tags {
        /// Issue key.
        key: String,
        /// New tags; none clears them.
        tags: Vec<String>,
    },
    /// Comment on an issue.
    Comment {
        /// Issue key.
        key: String,
        /// Comment text (markdown).
        text: String,
    },
}

impl Command {
    /// The issue key and change a mutating command performs; `None` for `show`.
    #[must_use]
    pub fn change(&self) -> Option<(&str, IssueChange)> {
        let (key, change) = match self {
            Self::Show { .. } => return None,
            Self::Transition { key, transition } => {
                (key, IssueChange::Transition { transition: transition.clone() })
            }
            Self::Assign { key, login } => (key, IssueChange::Assign { assignee: login.clone() }),
            Self::Severity { key, severity } => (key, IssueChange::SetSeverity { severity: *severity }),
            Self::Type { key, issue_type } => (key, IssueChange::SetType { issue_type: *issue_type }),
            Self::Tags { key, tags } => (key, IssueChange::SetTags { tags: tags.clone() }),
            Self::Comment { key, text } => (key, IssueChange::AddComment { text: text.clone() }),
        };
        Some((key.as_str(), change))
    }
}
