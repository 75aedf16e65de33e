//! Formatting helpers shared across front ends.
//!
//! These are plain formatters over an [`InterviewProjection`]: the text
//! export used for copy/download, and the progress label.

use crate::derive::{CategoryGroup, InterviewProjection, Progress};
use crate::error::Result;

/// Render the checklist as the plain-text export.
///
/// ```text
/// ## Budget, Fees & Commission
/// 1. What's your budget?
///    - Agents tailor searches to it
///    User Answer: 500k to 700k
/// ```
///
/// Groups are separated by a blank line. Unanswered items have no answer line.
pub fn checklist_text(projection: &InterviewProjection) -> String {
    projection
        .groups()
        .iter()
        .map(group_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn group_text(group: &CategoryGroup) -> String {
    let items = group
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut line = format!(
                "{}. {}\n   - {}",
                idx + 1,
                item.question,
                item.explanation
            );
            if let Some(answer) = item.answer.as_deref().filter(|a| !a.is_empty()) {
                line.push_str(&format!("\n   User Answer: {}", answer));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("## {}\n{}", group.category.display_name(), items)
}

/// Pretty JSON export of the whole projection.
pub fn checklist_json(projection: &InterviewProjection) -> Result<String> {
    Ok(serde_json::to_string_pretty(projection)?)
}

/// "Step 3 of 8", or `None` once the interview is complete.
pub fn progress_label(progress: &Progress, is_complete: bool) -> Option<String> {
    if is_complete {
        return None;
    }
    Some(format!(
        "Step {} of {}",
        progress.current_step, progress.total_steps
    ))
}

/// Fixed-width bar for terminals, e.g. `[#####---------------] 25%`.
pub fn progress_bar(progress: &Progress, width: usize) -> String {
    let filled = (width * progress.percent as usize / 100).min(width);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress.percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{derive_projection, DeriveOptions};
    use crate::types::{Role, Segment, Turn};
    use serde_json::json;

    fn question(id: &str, category: &str, question: &str) -> Segment {
        Segment::directive(
            "addQuestion",
            json!({
                "id": id,
                "category": category,
                "question": question,
                "explanation": format!("Why {id}")
            }),
        )
    }

    #[test]
    fn test_checklist_text_layout() {
        let turns = vec![
            Turn::new(
                Role::Assistant,
                vec![question("q1", "budget_fees", "What's your budget?")],
            ),
            Turn::user("500k to 700k"),
            Turn::new(
                Role::Assistant,
                vec![question("q2", "budget_fees", "Who pays commission?")],
            ),
            Turn::new(
                Role::Assistant,
                vec![question("q3", "local_knowledge", "Do you know the area?")],
            ),
        ];
        let projection = derive_projection(&turns, &DeriveOptions::default());

        let expected = "## Budget, Fees & Commission\n\
                        1. What's your budget?\n   - Why q1\n   User Answer: 500k to 700k\n\
                        2. Who pays commission?\n   - Why q2\n\n\
                        ## Local Knowledge\n\
                        1. Do you know the area?\n   - Why q3";
        assert_eq!(checklist_text(&projection), expected);
    }

    #[test]
    fn test_empty_checklist_text() {
        let projection = derive_projection(&[], &DeriveOptions::default());
        assert_eq!(checklist_text(&projection), "");
    }

    #[test]
    fn test_progress_label_hidden_when_complete() {
        let progress = Progress {
            current_step: 3,
            total_steps: 8,
            percent: 38,
        };
        assert_eq!(
            progress_label(&progress, false).as_deref(),
            Some("Step 3 of 8")
        );
        assert_eq!(progress_label(&progress, true), None);
    }

    #[test]
    fn test_progress_bar() {
        let progress = Progress {
            current_step: 2,
            total_steps: 8,
            percent: 25,
        };
        assert_eq!(progress_bar(&progress, 20), "[#####---------------] 25%");
    }

    #[test]
    fn test_checklist_json_contains_items() {
        let turns = vec![Turn::new(
            Role::Assistant,
            vec![question("q1", "property_type", "Condo or house?")],
        )];
        let projection = derive_projection(&turns, &DeriveOptions::default());
        let json = checklist_json(&projection).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["groups"][0]["items"][0]["id"], "q1");
    }
}
