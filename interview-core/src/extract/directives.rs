//! Recognition of embedded directives.
//!
//! A directive is only recognized when its name is known and its payload
//! carries every field its kind requires. Anything else is skipped: the
//! upstream generator may still be streaming the payload.

use crate::types::{Category, Directive, InterviewPhase, Priority, UserContext};
use serde_json::{Map, Value};

/// Directive kinds the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Adds a question to the checklist
    AddQuestion,
    /// Reports new facts about the buyer
    ContextUpdate,
    /// Announces a move to another interview phase
    PhaseTransition,
}

impl DirectiveKind {
    /// Resolve a directive name, accepting both wire and kebab spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "addQuestion" | "add-question" => Some(DirectiveKind::AddQuestion),
            "updateUserContext" | "context-update" => Some(DirectiveKind::ContextUpdate),
            "transitionPhase" | "phase-transition" => Some(DirectiveKind::PhaseTransition),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::AddQuestion => "add-question",
            DirectiveKind::ContextUpdate => "context-update",
            DirectiveKind::PhaseTransition => "phase-transition",
        }
    }
}

/// Payload of an accepted add-question directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDirective {
    pub id: String,
    pub category: Category,
    pub question: String,
    pub explanation: String,
    pub priority: Option<Priority>,
}

/// A directive whose payload passed validation
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedDirective {
    AddQuestion(QuestionDirective),
    ContextUpdate(UserContext),
    PhaseTransition(InterviewPhase),
}

impl ExtractedDirective {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            ExtractedDirective::AddQuestion(_) => DirectiveKind::AddQuestion,
            ExtractedDirective::ContextUpdate(_) => DirectiveKind::ContextUpdate,
            ExtractedDirective::PhaseTransition(_) => DirectiveKind::PhaseTransition,
        }
    }
}

/// Interpret one directive, or `None` if it is unknown or incomplete.
pub fn recognize(directive: &Directive) -> Option<ExtractedDirective> {
    let kind = DirectiveKind::from_name(&directive.name)?;
    let Some(payload) = directive.result.as_ref().and_then(Value::as_object) else {
        tracing::debug!(name = %directive.name, "Skipping directive without object payload");
        return None;
    };

    let extracted = match kind {
        DirectiveKind::AddQuestion => parse_question(payload).map(ExtractedDirective::AddQuestion),
        DirectiveKind::ContextUpdate => {
            Some(ExtractedDirective::ContextUpdate(parse_context(payload)))
        }
        DirectiveKind::PhaseTransition => payload
            .get("phase")
            .and_then(Value::as_str)
            .and_then(|p| p.parse().ok())
            .map(ExtractedDirective::PhaseTransition),
    };

    if extracted.is_none() {
        tracing::debug!(
            name = %directive.name,
            kind = kind.as_str(),
            "Skipping directive with missing or invalid fields"
        );
    }
    extracted
}

fn parse_question(payload: &Map<String, Value>) -> Option<QuestionDirective> {
    Some(QuestionDirective {
        id: non_blank(payload, "id")?.to_string(),
        category: payload.get("category")?.as_str()?.parse().ok()?,
        question: non_blank(payload, "question")?.to_string(),
        explanation: non_blank(payload, "explanation")?.to_string(),
        priority: payload
            .get("priority")
            .and_then(Value::as_str)
            .and_then(|p| p.parse().ok()),
    })
}

/// Fields with the wrong type are dropped one by one; the rest still apply.
fn parse_context(payload: &Map<String, Value>) -> UserContext {
    UserContext {
        is_first_time_buyer: payload.get("isFirstTimeBuyer").and_then(Value::as_bool),
        has_agent: payload.get("hasAgent").and_then(Value::as_bool),
        support_needs: payload.get("supportNeeds").and_then(string_list),
        location: payload
            .get("location")
            .and_then(|v| serde_json::from_value(v.clone()).ok()),
        budget: payload
            .get("budget")
            .and_then(|v| serde_json::from_value(v.clone()).ok()),
        property_type: payload.get("propertyType").and_then(string_list),
        timeline: payload
            .get("timeline")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn non_blank<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}
