//! Joins a raw issue with the relations shipped alongside it.

use super::{Component, Flow, Issue, IssueComment, Location, RawComment, RawIssue, Rule, TextRange, User};

/// End offset used for a range synthesized from a bare line number.
const WHOLE_LINE_END_OFFSET: u32 = 999_999;

/// Builds a display-ready [`Issue`] from a raw issue and its relations.
///
/// Components, users and rules are looked up by key (by login for users).
/// A relation missing from the payload leaves the derived fields `None`;
/// parsing never fails.
#[must_use]
pub fn parse_issue_from_response(
    raw: RawIssue,
    components: &[Component],
    users: &[User],
    rules: &[Rule],
) -> Issue {
    let component = find_component(components, &raw.component);
    let project = find_component(components, &raw.project);
    let sub_project = raw.sub_project.as_deref().and_then(|key| find_component(components, key));
    let rule = rules.iter().find(|r| r.key == raw.rule);
    let assignee = raw.assignee.as_deref().and_then(|login| find_user(users, login));

    let comments = raw.comments.into_iter().map(|c| resolve_comment(c, users)).collect();

    let closed = raw.status == "CLOSED";
    let (secondary_locations, flows) = if closed { (Vec::new(), Vec::new()) } else { split_flows(raw.flows) };
    let line = if closed { None } else { raw.line };
    let text_range = if closed {
        None
    } else {
        raw.text_range.or_else(|| {
            line.map(|line| TextRange {
                start_line: line,
                end_line: line,
                start_offset: 0,
                end_offset: WHOLE_LINE_END_OFFSET,
            })
        })
    };

    Issue {
        rule_name: rule.map(|r| r.name.clone()),
        rule_lang_name: rule.and_then(|r| r.lang_name.clone()),
        component_name: component.map(|c| c.name.clone()),
        component_long_name: component.and_then(|c| c.long_name.clone()),
        component_qualifier: component.and_then(|c| c.qualifier.clone()),
        component_path: component.and_then(|c| c.path.clone()),
        project_name: project.map(|c| c.name.clone()),
        sub_project_name: sub_project.map(|c| c.name.clone()),
        assignee_name: assignee.and_then(|u| u.name.clone()),
        assignee_avatar: assignee.and_then(|u| u.avatar.clone()),
        assignee_active: assignee.map(|u| u.active),
        key: raw.key,
        rule: raw.rule,
        severity: raw.severity,
        issue_type: raw.issue_type,
        status: raw.status,
        resolution: raw.resolution,
        message: raw.message,
        component: raw.component,
        project: raw.project,
        sub_project: raw.sub_project,
        line,
        text_range,
        secondary_locations,
        flows,
        assignee: raw.assignee,
        author: raw.author,
        tags: raw.tags,
        comments,
        effort: raw.effort,
        creation_date: raw.creation_date,
        update_date: raw.update_date,
        transitions: raw.transitions,
        actions: raw.actions,
    }
}

fn find_component<'a>(components: &'a [Component], key: &str) -> Option<&'a Component> {
    components.iter().find(|c| c.key == key)
}

fn find_user<'a>(users: &'a [User], login: &str) -> Option<&'a User> {
    users.iter().find(|u| u.login == login)
}

fn resolve_comment(comment: RawComment, users: &[User]) -> IssueComment {
    let author = comment.login.as_deref().and_then(|login| find_user(users, login));
    IssueComment {
        author_name: author.and_then(|u| u.name.clone()),
        author_avatar: author.and_then(|u| u.avatar.clone()),
        author_active: author.map(|u| u.active),
        key: comment.key,
        login: comment.login,
        html_text: comment.html_text,
        markdown: comment.markdown,
        updatable: comment.updatable,
        created_at: comment.created_at,
    }
}

/// Flows made only of single-location entries are secondary locations;
/// anything else is kept as a list of execution flows. Empty flows are
/// dropped first.
fn split_flows(flows: Vec<Flow>) -> (Vec<Location>, Vec<Vec<Location>>) {
    let flows: Vec<Vec<Location>> =
        flows.into_iter().map(|flow| flow.locations).filter(|locations| !locations.is_empty()).collect();
    if !flows.is_empty() && flows.iter().all(|locations| locations.len() == 1) {
        (flows.into_iter().flatten().collect(), Vec::new())
    } else {
        (Vec::new(), flows)
    }
}
