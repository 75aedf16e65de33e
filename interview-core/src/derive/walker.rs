//! Single pass over the transcript that reconstructs checklist items.
//!
//! The walker keeps one pending question. An accepted add-question directive
//! with a new id becomes pending; the next user turn with non-blank text
//! answers it and clears it. When a turn adds several questions only the
//! last new one stays pending, so the earlier ones cannot be answered by
//! adjacency.

use crate::extract::{extract_turn, ExtractedDirective};
use crate::types::{ChecklistItem, InterviewPhase, Role, Turn, UserContext};
use std::collections::HashMap;

/// Output of one walk over a transcript
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkResult {
    /// Items in order of first appearance, answers attached
    pub items: Vec<ChecklistItem>,
    /// Id of the question still waiting for the user's reply
    pub pending_question: Option<String>,
    /// Context updates folded in transcript order
    pub context: UserContext,
    /// Latest announced phase
    pub phase: InterviewPhase,
}

/// Walk `turns` in order and correlate questions with answers.
pub fn walk(turns: &[Turn]) -> WalkResult {
    let mut items: Vec<ChecklistItem> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut pending: Option<usize> = None;
    let mut context = UserContext::default();
    let mut phase = InterviewPhase::default();

    for (position, turn) in turns.iter().enumerate() {
        match turn.role {
            Role::Assistant => {
                for directive in extract_turn(turn).directives {
                    match directive {
                        ExtractedDirective::AddQuestion(q) => {
                            if let Some(&existing) = seen.get(&q.id) {
                                tracing::debug!(
                                    id = %q.id,
                                    position,
                                    first_index = existing,
                                    "Dropping duplicate question id"
                                );
                                continue;
                            }
                            seen.insert(q.id.clone(), items.len());
                            pending = Some(items.len());
                            items.push(ChecklistItem {
                                id: q.id,
                                category: q.category,
                                question: q.question,
                                explanation: q.explanation,
                                priority: q.priority,
                                answer: None,
                            });
                        }
                        ExtractedDirective::ContextUpdate(update) => context.merge(update),
                        ExtractedDirective::PhaseTransition(next) => phase = next,
                    }
                }
            }
            Role::User => {
                let text = turn.text();
                let answer = text.trim();
                if answer.is_empty() {
                    continue;
                }
                if let Some(index) = pending.take() {
                    items[index].answer = Some(answer.to_string());
                }
            }
        }
    }

    WalkResult {
        pending_question: pending.map(|index| items[index].id.clone()),
        items,
        context,
        phase,
    }
}
