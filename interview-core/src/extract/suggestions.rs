//! Quick-reply blocks inside assistant text.
//!
//! The assistant offers quick replies as a fenced block labeled
//! `suggestedResponses` whose body is a JSON array of strings:
//!
//! ````text
//! ```suggestedResponses
//! ["Yes", "No", "Not sure"]
//! ```
//! ````

/// Label that marks a fenced block as a suggestion list
pub const SUGGESTION_LABEL: &str = "suggestedResponses";

const FENCE: &str = "```";

/// Bodies of every closed fenced block labeled `label`, in order.
///
/// A block without a closing fence is still being streamed and is not returned.
pub fn fenced_blocks<'a>(text: &'a str, label: &str) -> Vec<&'a str> {
    let opener = format!("{FENCE}{label}");
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(&opener) {
        let after = &rest[start + opener.len()..];

        // `suggestedResponsesV2` is a different label
        if after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            rest = after;
            continue;
        }

        let Some(end) = after.find(FENCE) else {
            break;
        };
        blocks.push(&after[..end]);
        rest = &after[end + FENCE.len()..];
    }

    blocks
}

/// Parse one block body as a suggestion list.
///
/// Returns `None` unless the body is a JSON array of strings. Entries are
/// trimmed and blank entries dropped.
pub fn parse_suggestions(body: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(body.trim()) {
        Ok(entries) => Some(
            entries
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed suggestion block");
            None
        }
    }
}

/// First valid suggestion list found across `texts`.
pub fn first_suggestion_list<'a>(texts: impl IntoIterator<Item = &'a str>) -> Option<Vec<String>> {
    texts
        .into_iter()
        .flat_map(|text| fenced_blocks(text, SUGGESTION_LABEL))
        .find_map(parse_suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_labeled_block() {
        let text = "Great!\n```suggestedResponses\n[\"Yes\",\"No\",\"Not sure\"]\n```\nThanks";
        assert_eq!(
            first_suggestion_list([text]),
            Some(vec![
                "Yes".to_string(),
                "No".to_string(),
                "Not sure".to_string()
            ])
        );
    }

    #[test]
    fn test_inline_block_without_newline() {
        let text = "```suggestedResponses[\"A\", \"B\"]```";
        assert_eq!(
            first_suggestion_list([text]),
            Some(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn test_invalid_json_yields_nothing() {
        let text = "```suggestedResponses\n[\"Yes\", \"No\"\n```";
        assert_eq!(first_suggestion_list([text]), None);
    }

    #[test]
    fn test_wrong_shape_yields_nothing() {
        assert_eq!(parse_suggestions("{\"a\": 1}"), None);
        assert_eq!(parse_suggestions("[1, 2]"), None);
    }

    #[test]
    fn test_first_valid_block_wins() {
        let text = "```suggestedResponses\nnot json\n```\n\
                    ```suggestedResponses\n[\"Second\"]\n```\n\
                    ```suggestedResponses\n[\"Third\"]\n```";
        assert_eq!(
            first_suggestion_list([text]),
            Some(vec!["Second".to_string()])
        );
    }

    #[test]
    fn test_other_labels_are_ignored() {
        let text = "```json\n[\"Nope\"]\n```\n```suggestedResponsesV2\n[\"Nope\"]\n```";
        assert_eq!(first_suggestion_list([text]), None);
    }

    #[test]
    fn test_unclosed_block_is_ignored() {
        let text = "```suggestedResponses\n[\"Yes\", \"No\"]";
        assert!(fenced_blocks(text, SUGGESTION_LABEL).is_empty());
    }

    #[test]
    fn test_blank_entries_dropped() {
        assert_eq!(
            parse_suggestions("[\" Yes \", \"\", \"  \"]"),
            Some(vec!["Yes".to_string()])
        );
    }
}
