//! Active quick-reply selection.

use crate::extract::extract_suggestions;
use crate::types::Turn;

/// Suggestions from the most recent assistant turn, capped at `max`.
///
/// Only that one turn is consulted. If it has no valid suggestion block the
/// result is empty, even when an earlier assistant turn had one.
pub fn select_suggestions(turns: &[Turn], max: usize) -> Vec<String> {
    let Some(latest) = turns.iter().rev().find(|t| t.is_assistant()) else {
        return Vec::new();
    };

    let mut suggestions = extract_suggestions(latest).unwrap_or_default();
    suggestions.truncate(max);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_block(body: &str) -> Turn {
        Turn::assistant(format!("Next question\n```suggestedResponses\n{body}\n```"))
    }

    #[test]
    fn test_latest_assistant_turn_wins() {
        let turns = vec![
            with_block(r#"["Old"]"#),
            Turn::user("Old"),
            with_block(r#"["Yes","No","Not sure"]"#),
        ];
        assert_eq!(select_suggestions(&turns, 4), vec!["Yes", "No", "Not sure"]);
    }

    #[test]
    fn test_trailing_user_turn_still_uses_last_assistant() {
        let turns = vec![with_block(r#"["Yes","No"]"#), Turn::user("Yes")];
        assert_eq!(select_suggestions(&turns, 4), vec!["Yes", "No"]);
    }

    #[test]
    fn test_superseded_lists_are_discarded() {
        let turns = vec![with_block(r#"["Old"]"#), Turn::assistant("No block here")];
        assert!(select_suggestions(&turns, 4).is_empty());
    }

    #[test]
    fn test_invalid_block_is_empty() {
        let turns = vec![with_block(r#"["Yes", "No""#)];
        assert!(select_suggestions(&turns, 4).is_empty());
    }

    #[test]
    fn test_no_assistant_turns() {
        assert!(select_suggestions(&[], 4).is_empty());
        assert!(select_suggestions(&[Turn::user("hi")], 4).is_empty());
    }

    #[test]
    fn test_cap_applies() {
        let turns = vec![with_block(r#"["a","b","c","d","e"]"#)];
        assert_eq!(select_suggestions(&turns, 4), vec!["a", "b", "c", "d"]);
        assert_eq!(select_suggestions(&turns, 2), vec!["a", "b"]);
    }
}
