//! `issuesync show` command.

use std::fmt::Write as _;

use crate::context::ServiceContext;
use crate::issue::Issue;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error string if the issue cannot be loaded.
pub async fn run(ctx: &ServiceContext, key: &str) -> Result<(), String> {
    let issue = ctx
        .issues
        .fetch_issue(key)
        .await
        .map_err(|e| format!("Failed to load issue {key}: {e}"))?
        .into_issue();
    print!("{}", format_issue(&issue));
    Ok(())
}

/// Render an issue as a multi-line report.
#[must_use]
pub fn format_issue(issue: &Issue) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{issue}");
    let _ = writeln!(out, "  {}", issue.message);

    let rule = issue.rule_name.as_deref().unwrap_or(&issue.rule);
    match &issue.rule_lang_name {
        Some(lang) => {
            let _ = writeln!(out, "  Rule:      {rule} ({lang})");
        }
        None => {
            let _ = writeln!(out, "  Rule:      {rule}");
        }
    }

    let component = issue
        .component_long_name
        .as_deref()
        .or(issue.component_name.as_deref())
        .unwrap_or(&issue.component);
    match issue.line {
        Some(line) => {
            let _ = writeln!(out, "  Location:  {component}:{line}");
        }
        None => {
            let _ = writeln!(out, "  Location:  {component}");
        }
    }
    let _ = writeln!(out, "  Project:   {}", issue.project_name.as_deref().unwrap_or(&issue.project));

    if let Some(effort) = &issue.effort {
        let _ = writeln!(out, "  Effort:    {effort}");
    }
    if !issue.secondary_locations.is_empty() {
        let _ = writeln!(out, "  Secondary: {} location(s)", issue.secondary_locations.len());
    }
    if !issue.flows.is_empty() {
        let _ = writeln!(out, "  Flows:     {}", issue.flows.len());
    }
    if !issue.transitions.is_empty() {
        let _ = writeln!(out, "  Transitions: {}", issue.transitions.join(", "));
    }

    for comment in &issue.comments {
        let author = comment
            .author_name
            .as_deref()
            .or(comment.login.as_deref())
            .unwrap_or("unknown");
        let _ = writeln!(out, "  > {author}: {}", comment.markdown);
    }
    out
}
