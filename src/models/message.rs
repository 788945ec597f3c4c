//! Message variants keyed by the wire-level `role` tag.
//!
//! The role set is closed: `user`, `assistant`, `agent_messages`,
//! `filler_message` and `function`. Anything else deserializes into
//! [`Message::Unknown`], which the transcript renderer treats as an
//! explicit no-op rather than an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry in a record's ordered history.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Outbound message from the caller.
    User { content: String },
    /// Inbound reply from the bot.
    Assistant { content: String },
    /// Broadcast injected by the agent runtime.
    AgentMessage { content: String },
    /// Hold-the-line filler while a tool runs.
    Filler { content: String },
    /// Structured function call; `payload` carries arguments and/or the
    /// response, or an arbitrary JSON value.
    Function {
        name: String,
        payload: Option<Value>,
    },
    /// Unrecognized role, preserved for diagnostics but never rendered.
    Unknown { role: String },
}

/// Wire shape before role dispatch.
#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    name: Option<String>,
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawMessage::deserialize(deserializer)?;
        Ok(match raw.role.as_str() {
            "user" => Message::User {
                content: text_content(raw.content),
            },
            "assistant" => Message::Assistant {
                content: text_content(raw.content),
            },
            "agent_messages" => Message::AgentMessage {
                content: text_content(raw.content),
            },
            "filler_message" => Message::Filler {
                content: text_content(raw.content),
            },
            "function" => Message::Function {
                name: raw.name.unwrap_or_else(|| "Unknown Function".to_string()),
                payload: raw.content,
            },
            _ => Message::Unknown { role: raw.role },
        })
    }
}

impl Message {
    /// The role tag this message arrived with.
    pub fn role(&self) -> &str {
        match self {
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
            Message::AgentMessage { .. } => "agent_messages",
            Message::Filler { .. } => "filler_message",
            Message::Function { .. } => "function",
            Message::Unknown { role } => role,
        }
    }
}

/// Coerce a content value into bubble text. Non-string content shows its
/// compact JSON form; missing content is empty.
fn text_content(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("message should deserialize")
    }

    #[test]
    fn test_user_and_assistant_roles() {
        assert_eq!(
            parse(json!({ "role": "user", "content": "hi" })),
            Message::User {
                content: "hi".to_string()
            }
        );
        assert_eq!(
            parse(json!({ "role": "assistant", "content": "hello" })),
            Message::Assistant {
                content: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_agent_and_filler_roles() {
        assert!(matches!(
            parse(json!({ "role": "agent_messages", "content": "fyi" })),
            Message::AgentMessage { .. }
        ));
        assert!(matches!(
            parse(json!({ "role": "filler_message", "content": "hold on" })),
            Message::Filler { .. }
        ));
    }

    #[test]
    fn test_function_role_keeps_payload() {
        let message = parse(json!({
            "role": "function",
            "name": "book_slot",
            "content": { "arguments": { "slot": 3 } }
        }));
        match message {
            Message::Function { name, payload } => {
                assert_eq!(name, "book_slot");
                assert_eq!(payload, Some(json!({ "arguments": { "slot": 3 } })));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_function_without_name_gets_placeholder() {
        let message = parse(json!({ "role": "function", "content": {} }));
        match message {
            Message::Function { name, .. } => assert_eq!(name, "Unknown Function"),
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_role_is_preserved_not_rejected() {
        let message = parse(json!({ "role": "tool_result", "content": "x" }));
        assert_eq!(
            message,
            Message::Unknown {
                role: "tool_result".to_string()
            }
        );
    }

    #[test]
    fn test_non_string_content_coerces() {
        let message = parse(json!({ "role": "user", "content": { "text": "hi" } }));
        match message {
            Message::User { content } => assert_eq!(content, r#"{"text":"hi"}"#),
            other => panic!("expected user, got {:?}", other),
        }
    }
}
