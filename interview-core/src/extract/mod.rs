//! Per-turn extraction of directives and quick replies.
//!
//! [`extract_turn`] is a pure function of one turn. It never fails: unknown
//! or incomplete directives and malformed suggestion blocks are dropped, and
//! the rest of the turn is still extracted.

mod directives;
mod suggestions;

pub use directives::{recognize, DirectiveKind, ExtractedDirective, QuestionDirective};
pub use suggestions::{fenced_blocks, first_suggestion_list, parse_suggestions, SUGGESTION_LABEL};

use crate::types::Turn;

/// Everything recognized in a single assistant turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnExtraction {
    /// Accepted directives in order of appearance
    pub directives: Vec<ExtractedDirective>,
    /// First valid suggestion list, if any
    pub suggestions: Option<Vec<String>>,
}

impl TurnExtraction {
    /// Accepted add-question directives, in order.
    pub fn questions(&self) -> impl Iterator<Item = &QuestionDirective> {
        self.directives.iter().filter_map(|d| match d {
            ExtractedDirective::AddQuestion(q) => Some(q),
            _ => None,
        })
    }
}

/// Extract directives and the suggestion list from one turn.
///
/// User turns carry neither and yield an empty extraction.
pub fn extract_turn(turn: &Turn) -> TurnExtraction {
    if !turn.is_assistant() {
        return TurnExtraction::default();
    }

    TurnExtraction {
        directives: turn.directives().filter_map(recognize).collect(),
        suggestions: extract_suggestions(turn),
    }
}

/// Suggestion step only, for callers that do not need the directives.
pub fn extract_suggestions(turn: &Turn) -> Option<Vec<String>> {
    if !turn.is_assistant() {
        return None;
    }
    first_suggestion_list(turn.texts())
}
