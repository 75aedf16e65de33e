//! Transcript-to-projection derivation.
//!
//! [`derive_projection`] is a total, pure function of a transcript snapshot.
//! It carries no state between calls: the same transcript always yields the
//! same projection, whether it was built turn by turn or loaded at once.
//!
//! ```text
//! transcript ──► walker ──► checklist aggregation ──┐
//!     │                                             ├──► InterviewProjection
//!     └────────► suggestion selection ──────────────┘
//! ```

mod checklist;
mod suggestions;
mod walker;

pub use checklist::{CategoryGroup, Checklist, Progress};
pub use suggestions::select_suggestions;
pub use walker::{walk, WalkResult};

use crate::config::{InterviewConfig, MAX_SUGGESTIONS};
use crate::types::{Category, ChecklistItem, InterviewPhase, Turn, UserContext};
use serde::Serialize;

/// Knobs for a derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Maximum number of quick replies returned
    pub max_suggestions: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            max_suggestions: MAX_SUGGESTIONS,
        }
    }
}

impl From<&InterviewConfig> for DeriveOptions {
    fn from(config: &InterviewConfig) -> Self {
        Self {
            max_suggestions: config.max_suggestions.clamp(1, MAX_SUGGESTIONS),
        }
    }
}

/// Everything derived from one transcript snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterviewProjection {
    /// Grouped checklist and completion flags
    #[serde(flatten)]
    pub checklist: Checklist,
    /// Step indicator derived from completed categories
    pub progress: Progress,
    /// Quick replies for the current turn
    pub suggestions: Vec<String>,
    /// Question still waiting for the user's reply
    pub pending_question: Option<String>,
    /// Merged buyer context
    pub context: UserContext,
    /// Latest announced phase
    pub phase: InterviewPhase,
}

impl InterviewProjection {
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.checklist.groups
    }

    pub fn completed_categories(&self) -> &[Category] {
        &self.checklist.completed_categories
    }

    pub fn is_complete(&self) -> bool {
        self.checklist.is_complete
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.checklist.items()
    }

    /// Look up an item by question id.
    pub fn item(&self, id: &str) -> Option<&ChecklistItem> {
        self.items().find(|i| i.id == id)
    }
}

/// Derive the full projection from a transcript snapshot.
pub fn derive_projection(turns: &[Turn], options: &DeriveOptions) -> InterviewProjection {
    let WalkResult {
        items,
        pending_question,
        context,
        phase,
    } = walk(turns);

    let checklist = Checklist::aggregate(items);
    let progress = checklist.progress();
    let suggestions = select_suggestions(turns, options.max_suggestions);

    tracing::trace!(
        turns = turns.len(),
        categories = checklist.groups.len(),
        completed = checklist.completed_categories.len(),
        suggestions = suggestions.len(),
        "Derived projection"
    );

    InterviewProjection {
        checklist,
        progress,
        suggestions,
        pending_question,
        context,
        phase,
    }
}
