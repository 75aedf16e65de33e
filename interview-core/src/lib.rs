//! # interview-core
//!
//! Core library for interview - a guided real estate agent interview that
//! builds a categorized question checklist from the conversation.
//!
//! This library provides:
//! - Domain types for turns, directives and checklist items
//! - Per-turn extraction of directives and quick-reply suggestions
//! - Derivation of the interview projection from a transcript
//! - A session controller that publishes projections on every change
//! - Transcript file loading and saving
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows one way and the transcript is never mutated by derivation:
//! - **Transcript:** ordered user/assistant turns (append-only, replayable)
//! - **Extraction:** directives and suggestion blocks per assistant turn
//! - **Projection:** grouped checklist, completion, suggestions (recomputed from scratch)
//!
//! ## Example
//!
//! ```rust
//! use interview_core::{derive_projection, DeriveOptions, Segment, Turn, Role};
//! use serde_json::json;
//!
//! let turns = vec![
//!     Turn::new(Role::Assistant, vec![Segment::directive("addQuestion", json!({
//!         "id": "q1",
//!         "category": "budget_fees",
//!         "question": "What's your budget?",
//!         "explanation": "Agents tailor the search to it",
//!     }))]),
//!     Turn::user("500k to 700k"),
//! ];
//!
//! let projection = derive_projection(&turns, &DeriveOptions::default());
//! assert_eq!(projection.item("q1").unwrap().answer.as_deref(), Some("500k to 700k"));
//! assert!(!projection.is_complete());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use derive::{derive_projection, DeriveOptions, InterviewProjection};
pub use error::{Error, Result};
pub use session::InterviewSession;
pub use types::*;

// Public modules
pub mod config;
pub mod derive;
pub mod error;
pub mod extract;
pub mod format;
pub mod logging;
pub mod session;
pub mod transcript;
pub mod types;
