//! Conversion between on-disk turn objects and [`Turn`].
//!
//! Accepted turn shape (camelCase, every field but `role` optional):
//!
//! ```json
//! {"id": "m1", "role": "assistant", "createdAt": "2025-06-01T10:00:00Z",
//!  "content": "fallback text",
//!  "parts": [
//!    {"type": "text", "text": "..."},
//!    {"type": "tool", "toolName": "addQuestion", "result": {...}},
//!    {"type": "tool-invocation",
//!     "toolInvocation": {"toolName": "addQuestion", "state": "result", "result": {...}}}
//!  ]}
//! ```
//!
//! `content` is only used when `parts` carries no non-blank text, so a user
//! reply stored only in `content` still reads as the answer.

use crate::types::{Directive, Role, Segment, Turn};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

/// Outcome of decoding a single turn object
#[derive(Debug)]
pub(crate) enum Decoded {
    Turn(Turn),
    /// Not a user/assistant turn or not an object; the reason goes to warnings
    Skipped(String),
}

/// Decode one turn object. `fallback_id` is used when the object has no id.
pub(crate) fn decode_turn(value: Value, fallback_id: String) -> Decoded {
    let Value::Object(obj) = value else {
        return Decoded::Skipped("turn is not a JSON object".to_string());
    };

    let role = match obj.get("role").and_then(Value::as_str) {
        Some("user") => Role::User,
        Some("assistant") => Role::Assistant,
        Some(other) => return Decoded::Skipped(format!("unsupported role '{}'", other)),
        None => return Decoded::Skipped("turn has no role".to_string()),
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback_id,
    };

    let created_at = obj
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let mut segments: Vec<Segment> = obj
        .get("parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(decode_part).collect())
        .unwrap_or_default();

    let has_text = segments
        .iter()
        .any(|s| matches!(s, Segment::Text { text } if !text.trim().is_empty()));
    if !has_text {
        if let Some(text) = obj.get("content").and_then(Value::as_str) {
            if segments.is_empty() || !text.trim().is_empty() {
                segments.push(Segment::text(text));
            }
        }
    }

    Decoded::Turn(Turn {
        id,
        role,
        created_at,
        segments,
    })
}

fn decode_part(part: &Value) -> Option<Segment> {
    let obj = part.as_object()?;
    match obj.get("type").and_then(Value::as_str)? {
        "text" => obj
            .get("text")
            .and_then(Value::as_str)
            .map(Segment::text),
        "tool" => decode_tool(obj),
        "tool-invocation" => obj
            .get("toolInvocation")
            .and_then(Value::as_object)
            .and_then(decode_tool),
        other => {
            tracing::trace!(part_type = other, "Ignoring non-content part");
            None
        }
    }
}

/// A tool part only carries a payload once its state is `result`.
fn decode_tool(obj: &Map<String, Value>) -> Option<Segment> {
    let name = obj
        .get("toolName")
        .or_else(|| obj.get("name"))
        .and_then(Value::as_str)?;

    let finished = obj
        .get("state")
        .and_then(Value::as_str)
        .map_or(true, |state| state == "result");

    let result = obj
        .get("result")
        .filter(|_| finished)
        .filter(|v| !v.is_null())
        .cloned();

    Some(Segment::Directive(Directive {
        name: name.to_string(),
        result,
    }))
}

/// Encode a turn in the shape [`decode_turn`] reads back.
pub(crate) fn encode_turn(turn: &Turn) -> Value {
    let parts: Vec<Value> = turn
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { text } => json!({"type": "text", "text": text}),
            Segment::Directive(d) => match &d.result {
                Some(result) => json!({"type": "tool", "toolName": d.name, "result": result}),
                None => json!({"type": "tool", "toolName": d.name, "state": "call"}),
            },
        })
        .collect();

    let mut obj = Map::new();
    obj.insert("id".to_string(), json!(turn.id));
    obj.insert("role".to_string(), json!(turn.role.as_str()));
    if let Some(created_at) = turn.created_at {
        obj.insert("createdAt".to_string(), json!(created_at.to_rfc3339()));
    }
    obj.insert("content".to_string(), json!(turn.text()));
    obj.insert("parts".to_string(), Value::Array(parts));
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(value: Value) -> Turn {
        match decode_turn(value, "turn-1".to_string()) {
            Decoded::Turn(turn) => turn,
            Decoded::Skipped(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn test_content_only_user_turn() {
        let turn = decoded(json!({"role": "user", "content": "500k to 700k"}));
        assert_eq!(turn.id, "turn-1");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.text(), "500k to 700k");
    }

    #[test]
    fn test_parts_take_precedence_over_content() {
        let turn = decoded(json!({
            "id": "m2",
            "role": "assistant",
            "content": "ignored",
            "parts": [
                {"type": "step-start"},
                {"type": "text", "text": "Hello"},
                {"type": "tool", "toolName": "addQuestion", "result": {"id": "q1"}}
            ]
        }));
        assert_eq!(turn.id, "m2");
        assert_eq!(turn.text(), "Hello");
        let directive = turn.directives().next().unwrap();
        assert_eq!(directive.name, "addQuestion");
        assert_eq!(directive.result, Some(json!({"id": "q1"})));
    }

    #[test]
    fn test_content_used_when_parts_text_is_blank() {
        let turn = decoded(json!({
            "role": "user",
            "content": "yes",
            "parts": [{"type": "text", "text": ""}]
        }));
        assert_eq!(turn.text().trim(), "yes");

        let turn = decoded(json!({
            "role": "assistant",
            "content": "",
            "parts": [{"type": "tool", "toolName": "addQuestion", "result": {"id": "q1"}}]
        }));
        assert_eq!(turn.segments.len(), 1);
    }

    #[test]
    fn test_nested_invocation_without_result_state() {
        let turn = decoded(json!({
            "role": "assistant",
            "parts": [
                {"type": "tool-invocation", "toolInvocation": {
                    "toolName": "addQuestion", "state": "partial-call", "result": {"id": "q1"}
                }},
                {"type": "tool-invocation", "toolInvocation": {
                    "toolName": "transitionPhase", "state": "result", "result": {"phase": "diagnostic"}
                }}
            ]
        }));
        let directives: Vec<_> = turn.directives().collect();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].result, None);
        assert_eq!(directives[1].result, Some(json!({"phase": "diagnostic"})));
    }

    #[test]
    fn test_unsupported_roles_are_skipped() {
        assert!(matches!(
            decode_turn(json!({"role": "system", "content": "x"}), "t".to_string()),
            Decoded::Skipped(_)
        ));
        assert!(matches!(
            decode_turn(json!(["not", "a", "turn"]), "t".to_string()),
            Decoded::Skipped(_)
        ));
    }

    #[test]
    fn test_encode_then_decode_preserves_turn() {
        let original = Turn::new(
            Role::Assistant,
            vec![
                Segment::text("Hi"),
                Segment::directive("addQuestion", json!({"id": "q1"})),
                Segment::Directive(Directive {
                    name: "updateUserContext".to_string(),
                    result: None,
                }),
            ],
        );
        let restored = decoded(encode_turn(&original));
        assert_eq!(restored, original);
    }
}
