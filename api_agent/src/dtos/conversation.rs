use base44::models::conversation::{Conversation, Message};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
}

/// Payload of one server-sent event: the full message list of the
/// conversation at that point.
#[derive(Debug, Serialize)]
pub struct ConversationEvent<'a> {
    pub conversation_id: &'a str,
    pub messages: &'a [Message],
}
