//! Terminal rendering of an interview projection

use interview_core::derive::CategoryGroup;
use interview_core::format::{progress_bar, progress_label};
use interview_core::{ChecklistItem, InterviewProjection, UserContext};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Full human-readable view used by `show`.
pub fn projection(projection: &InterviewProjection, source: &str, turns: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Transcript: {} ({} turns)", source, turns);
    let _ = writeln!(out, "Phase:      {}", projection.phase.as_str());
    let _ = writeln!(out, "Progress:   {}", progress(projection));
    if let Some(context) = context_line(&projection.context) {
        let _ = writeln!(out, "Context:    {}", context);
    }

    if projection.checklist.is_empty() {
        out.push_str("\nNo questions yet.\n");
    }
    for group in projection.groups() {
        out.push('\n');
        out.push_str(&group_block(group));
    }

    if let Some(pending) = projection
        .pending_question
        .as_deref()
        .and_then(|id| projection.item(id))
    {
        let _ = writeln!(out, "\nWaiting on: {}", pending.question);
    }

    if !projection.suggestions.is_empty() {
        out.push('\n');
        out.push_str(&suggestions(&projection.suggestions));
    }

    out
}

/// Progress bar plus step label, or a completion note.
pub fn progress(projection: &InterviewProjection) -> String {
    let bar = progress_bar(&projection.progress, BAR_WIDTH);
    match progress_label(&projection.progress, projection.is_complete()) {
        Some(label) => format!("{}  {}", bar, label),
        None => format!("{}  Checklist complete", bar),
    }
}

/// One-line summary for watch output.
pub fn status_line(projection: &InterviewProjection) -> String {
    let total = projection.items().count();
    let answered = projection.items().filter(|i| i.is_answered()).count();
    format!(
        "{}/{} categories, {} questions ({} answered)",
        projection.completed_categories().len(),
        projection.progress.total_steps,
        total,
        answered
    )
}

/// Numbered quick replies, 1-based to match `answer --suggestion`.
pub fn suggestions(list: &[String]) -> String {
    let mut out = String::from("Suggested replies:\n");
    for (idx, text) in list.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, text);
    }
    out
}

fn group_block(group: &CategoryGroup) -> String {
    let mut out = String::new();
    let marker = if group.complete { " [complete]" } else { "" };
    let _ = writeln!(out, "## {}{}", group.category.display_name(), marker);
    for item in &group.items {
        out.push_str(&item_block(item));
    }
    out
}

fn item_block(item: &ChecklistItem) -> String {
    let mut out = String::new();
    let check = if item.is_answered() { "x" } else { " " };
    let priority = item
        .priority
        .map(|p| format!(" ({})", p.as_str()))
        .unwrap_or_default();
    let _ = writeln!(out, "  [{}] {}{}", check, item.question, priority);
    let _ = writeln!(out, "      {}", item.explanation);
    if let Some(answer) = item.answer.as_deref().filter(|a| !a.is_empty()) {
        let _ = writeln!(out, "      Answer: {}", answer);
    }
    out
}

fn context_line(context: &UserContext) -> Option<String> {
    if context.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    match context.is_first_time_buyer {
        Some(true) => parts.push("first-time buyer".to_string()),
        Some(false) => parts.push("repeat buyer".to_string()),
        None => {}
    }
    match context.has_agent {
        Some(true) => parts.push("has an agent".to_string()),
        Some(false) => parts.push("looking for an agent".to_string()),
        None => {}
    }
    if let Some(location) = &context.location {
        parts.push(format!("{}, {}", location.city, location.state));
    }
    if let Some(budget) = &context.budget {
        parts.push(format!("budget {}-{}", budget.min, budget.max));
    }
    if let Some(types) = context.property_type.as_ref().filter(|t| !t.is_empty()) {
        parts.push(types.join("/"));
    }
    if let Some(timeline) = &context.timeline {
        parts.push(format!("timeline {}", timeline));
    }
    if let Some(needs) = context.support_needs.as_ref().filter(|n| !n.is_empty()) {
        parts.push(format!("needs {}", needs.join(", ")));
    }

    Some(parts.join("; "))
}
