use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversationMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub arguments_string: Option<String>,
    #[serde(default)]
    pub results: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_date: Option<DateTime<Utc>>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            created_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<ConversationMetadata>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<Message>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_date: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Message>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_messages_become_empty() {
        let convo: Conversation =
            serde_json::from_value(serde_json::json!({ "id": "c1", "messages": null })).unwrap();
        assert!(convo.messages.is_empty());
        assert!(convo.metadata.is_none());
    }

    #[test]
    fn tool_calls_default_to_empty() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "role": "assistant",
            "content": "hello",
            "created_date": "2025-01-15T10:30:00.000000"
        }))
        .unwrap();
        assert!(msg.tool_calls.is_empty());
        assert!(msg.created_date.is_some());
    }
}
