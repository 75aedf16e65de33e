//! Core domain types for interview
//!
//! These types describe a conversation transcript as the derivation engine
//! sees it, and the records it reconstructs from one.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Turn** | One transcript entry, written by the user or the assistant |
//! | **Segment** | One piece of a turn's content: plain text or a directive |
//! | **Directive** | A named, machine-readable invocation embedded in an assistant turn |
//! | **Category** | One of the 8 fixed interview topic buckets |
//! | **ChecklistItem** | A question reconstructed from a directive, plus its answer |
//! | **Phase** | Discovery or diagnostic stage, as announced by the assistant |
//!
//! Turns are immutable once appended. A transcript may be replaced wholesale
//! but past turns are never edited in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Roles
// ============================================

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person being interviewed
    User,
    /// The reasoning component driving the interview
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

// ============================================
// Categories
// ============================================

/// The closed set of interview topic buckets.
///
/// Declaration order is the canonical order used for completion reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AgentRelationship,
    LocalKnowledge,
    ProcessFamiliarity,
    CommunicationAvailability,
    BudgetFees,
    LoanEligibility,
    PropertyType,
    LifestyleCulturalFit,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Category; 8] = [
        Category::AgentRelationship,
        Category::LocalKnowledge,
        Category::ProcessFamiliarity,
        Category::CommunicationAvailability,
        Category::BudgetFees,
        Category::LoanEligibility,
        Category::PropertyType,
        Category::LifestyleCulturalFit,
    ];

    /// Returns the identifier used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::AgentRelationship => "agent_relationship",
            Category::LocalKnowledge => "local_knowledge",
            Category::ProcessFamiliarity => "process_familiarity",
            Category::CommunicationAvailability => "communication_availability",
            Category::BudgetFees => "budget_fees",
            Category::LoanEligibility => "loan_eligibility",
            Category::PropertyType => "property_type",
            Category::LifestyleCulturalFit => "lifestyle_cultural_fit",
        }
    }

    /// Returns the heading shown to the user
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::AgentRelationship => "Agent Relationship",
            Category::LocalKnowledge => "Local Knowledge",
            Category::ProcessFamiliarity => "Process Familiarity",
            Category::CommunicationAvailability => "Communication & Availability",
            Category::BudgetFees => "Budget, Fees & Commission",
            Category::LoanEligibility => "Loan Eligibility",
            Category::PropertyType => "Property Type",
            Category::LifestyleCulturalFit => "Lifestyle & Cultural Fit",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// How urgent a question is, as suggested by the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

/// Stage of the interview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    /// Learning about the buyer's situation
    #[default]
    Discovery,
    /// Working through the checklist categories
    Diagnostic,
}

impl InterviewPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewPhase::Discovery => "discovery",
            InterviewPhase::Diagnostic => "diagnostic",
        }
    }
}

impl std::str::FromStr for InterviewPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(InterviewPhase::Discovery),
            "diagnostic" => Ok(InterviewPhase::Diagnostic),
            _ => Err(format!("unknown phase: {}", s)),
        }
    }
}

// ============================================
// Turns
// ============================================

/// A named invocation embedded in a turn, with its raw result payload.
///
/// The payload is kept as opaque JSON; interpretation happens in
/// [`crate::extract`], which tolerates any shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    /// Invocation name, e.g. `addQuestion`
    pub name: String,
    /// Result payload (absent while the invocation is still streaming)
    pub result: Option<serde_json::Value>,
}

impl Directive {
    pub fn new(name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            result: Some(result),
        }
    }
}

/// One piece of a turn's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Free text (markdown, may contain fenced blocks)
    Text { text: String },
    /// Embedded directive
    Directive(Directive),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text { text: text.into() }
    }

    pub fn directive(name: impl Into<String>, result: serde_json::Value) -> Self {
        Segment::Directive(Directive::new(name, result))
    }
}

/// One entry in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Opaque turn identifier
    pub id: String,
    /// Who wrote this turn
    pub role: Role,
    /// When the turn was created (if known)
    pub created_at: Option<DateTime<Utc>>,
    /// Ordered content
    pub segments: Vec<Segment>,
}

impl Turn {
    /// Create a turn with a fresh identifier and the current timestamp.
    pub fn new(role: Role, segments: Vec<Segment>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            created_at: Some(Utc::now()),
            segments,
        }
    }

    /// A user turn carrying plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![Segment::text(text)])
    }

    /// An assistant turn carrying plain text.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![Segment::text(text)])
    }

    /// Replace the generated identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Text segments, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Text { text } => Some(text.as_str()),
            Segment::Directive(_) => None,
        })
    }

    /// Directive segments, in order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Directive(d) => Some(d),
            Segment::Text { .. } => None,
        })
    }

    /// All text segments joined by newlines.
    pub fn text(&self) -> String {
        self.texts().collect::<Vec<_>>().join("\n")
    }
}

// ============================================
// Derived records
// ============================================

/// A question reconstructed from an add-question directive.
///
/// `answer` is only ever attached after the item exists, from the user turn
/// that immediately follows the directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub category: Category,
    pub question: String,
    pub explanation: String,
    pub priority: Option<Priority>,
    pub answer: Option<String>,
}

impl ChecklistItem {
    /// True when a non-empty answer has been attached.
    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Buyer location reported by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

/// Budget range reported by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: f64,
    pub max: f64,
}

/// What the assistant has learned about the buyer so far.
///
/// Every field is optional: context updates are partial and merge field by
/// field, later values replacing earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub is_first_time_buyer: Option<bool>,
    pub has_agent: Option<bool>,
    pub support_needs: Option<Vec<String>>,
    pub location: Option<Location>,
    pub budget: Option<Budget>,
    pub property_type: Option<Vec<String>>,
    pub timeline: Option<String>,
}

impl UserContext {
    /// Fold a partial update into this context.
    pub fn merge(&mut self, update: UserContext) {
        if update.is_first_time_buyer.is_some() {
            self.is_first_time_buyer = update.is_first_time_buyer;
        }
        if update.has_agent.is_some() {
            self.has_agent = update.has_agent;
        }
        if update.support_needs.is_some() {
            self.support_needs = update.support_needs;
        }
        if update.location.is_some() {
            self.location = update.location;
        }
        if update.budget.is_some() {
            self.budget = update.budget;
        }
        if update.property_type.is_some() {
            self.property_type = update.property_type;
        }
        if update.timeline.is_some() {
            self.timeline = update.timeline;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == UserContext::default()
    }
}

// ============================================
// Session
// ============================================

/// Lifecycle of an interview session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::Active => "active",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("pricing".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::CommunicationAvailability).unwrap();
        assert_eq!(json, "\"communication_availability\"");
        assert_eq!(
            Category::CommunicationAvailability.display_name(),
            "Communication & Availability"
        );
    }

    #[test]
    fn test_turn_text_skips_directives() {
        let turn = Turn::new(
            Role::Assistant,
            vec![
                Segment::text("first"),
                Segment::directive("addQuestion", serde_json::json!({})),
                Segment::text("second"),
            ],
        );
        assert_eq!(turn.text(), "first\nsecond");
        assert_eq!(turn.directives().count(), 1);
    }

    #[test]
    fn test_user_context_merge_keeps_earlier_fields() {
        let mut ctx = UserContext {
            has_agent: Some(false),
            timeline: Some("3 months".to_string()),
            ..Default::default()
        };
        ctx.merge(UserContext {
            has_agent: Some(true),
            ..Default::default()
        });
        assert_eq!(ctx.has_agent, Some(true));
        assert_eq!(ctx.timeline.as_deref(), Some("3 months"));
    }

    #[test]
    fn test_checklist_item_answered() {
        let mut item = ChecklistItem {
            id: "q1".to_string(),
            category: Category::BudgetFees,
            question: "What's your budget?".to_string(),
            explanation: "Sets the search range".to_string(),
            priority: None,
            answer: None,
        };
        assert!(!item.is_answered());
        item.answer = Some(String::new());
        assert!(!item.is_answered());
        item.answer = Some("500k".to_string());
        assert!(item.is_answered());
    }
}
