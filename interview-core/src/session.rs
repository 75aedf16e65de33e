//! Interview session controller
//!
//! [`InterviewSession`] holds the transcript snapshot, owns the
//! `not-started → active` transition and re-derives the projection after
//! every change. Each projection is published on a `tokio::sync::watch`
//! channel; the channel needs no runtime, and subscribers always see the
//! latest value.
//!
//! ## Example
//!
//! ```rust
//! use interview_core::config::InterviewConfig;
//! use interview_core::session::InterviewSession;
//!
//! let mut session = InterviewSession::new(InterviewConfig::default());
//! let updates = session.subscribe();
//!
//! session.start();
//! session.answer("I'm looking for an agent");
//!
//! assert_eq!(session.turns().len(), 2);
//! assert!(!updates.borrow().is_complete());
//! ```

use crate::config::InterviewConfig;
use crate::derive::{derive_projection, DeriveOptions, InterviewProjection};
use crate::error::{Error, Result};
use crate::types::{SessionState, Turn};
use tokio::sync::watch;

/// Identifier of the synthesized greeting turn
pub const WELCOME_TURN_ID: &str = "initial-assistant";

/// Drives one interview over a transcript snapshot.
#[derive(Debug)]
pub struct InterviewSession {
    state: SessionState,
    turns: Vec<Turn>,
    config: InterviewConfig,
    options: DeriveOptions,
    publisher: watch::Sender<InterviewProjection>,
}

impl InterviewSession {
    /// A fresh, not-started session with an empty transcript.
    pub fn new(config: InterviewConfig) -> Self {
        Self::resume(Vec::new(), config)
    }

    /// Resume from an existing transcript. Non-empty transcripts start active.
    pub fn resume(turns: Vec<Turn>, config: InterviewConfig) -> Self {
        let options = DeriveOptions::from(&config);
        let projection = derive_projection(&turns, &options);
        let (publisher, _) = watch::channel(projection);
        let state = if turns.is_empty() {
            SessionState::NotStarted
        } else {
            SessionState::Active
        };

        tracing::debug!(turns = turns.len(), state = state.as_str(), "Session created");

        Self {
            state,
            turns,
            config,
            options,
            publisher,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Current transcript snapshot
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Latest published projection
    pub fn projection(&self) -> InterviewProjection {
        self.publisher.borrow().clone()
    }

    /// Quick replies for the current turn
    pub fn suggestions(&self) -> Vec<String> {
        self.publisher.borrow().suggestions.clone()
    }

    /// Observe every projection published from now on.
    pub fn subscribe(&self) -> watch::Receiver<InterviewProjection> {
        self.publisher.subscribe()
    }

    /// Start the interview.
    ///
    /// An empty transcript is seeded with the welcome turn, which is returned.
    /// A transcript that already has turns is left untouched and `None` is
    /// returned, so calling this repeatedly never adds more than one greeting.
    pub fn start(&mut self) -> Option<&Turn> {
        self.state = SessionState::Active;

        if !self.turns.is_empty() {
            tracing::debug!(turns = self.turns.len(), "Start on existing transcript");
            return None;
        }

        let welcome = Turn::assistant(self.config.welcome_message.clone()).with_id(WELCOME_TURN_ID);
        self.turns.push(welcome);
        tracing::info!("Interview started");
        self.refresh();
        self.turns.last()
    }

    /// Append one turn and re-derive.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.state = SessionState::Active;
        self.refresh();
    }

    /// Replace the whole transcript (e.g. after a re-render) and re-derive.
    pub fn replace_transcript(&mut self, turns: Vec<Turn>) {
        tracing::info!(
            previous = self.turns.len(),
            turns = turns.len(),
            "Transcript replaced"
        );
        self.turns = turns;
        if !self.turns.is_empty() {
            self.state = SessionState::Active;
        }
        self.refresh();
    }

    /// Append the user's free-text reply.
    pub fn answer(&mut self, text: impl Into<String>) -> &Turn {
        self.append(Turn::user(text));
        &self.turns[self.turns.len() - 1]
    }

    /// Reply with the active suggestion at `index` (0-based).
    pub fn select_suggestion(&mut self, index: usize) -> Result<&Turn> {
        let suggestions = self.suggestions();
        let Some(text) = suggestions.get(index).cloned() else {
            return Err(Error::Suggestion(format!(
                "no suggestion at position {} ({} available)",
                index + 1,
                suggestions.len()
            )));
        };
        Ok(self.answer(text))
    }

    fn refresh(&mut self) {
        let projection = derive_projection(&self.turns, &self.options);
        tracing::debug!(
            turns = self.turns.len(),
            completed = projection.completed_categories().len(),
            is_complete = projection.is_complete(),
            "Publishing projection"
        );
        self.publisher.send_replace(projection);
    }
}
