use serde::Serialize;

use crate::models::conversation::ConversationMetadata;

#[derive(Debug, Clone, Serialize)]
pub struct ConversationFilter {
    pub agent_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewConversation {
    pub agent_name: String,
    pub metadata: ConversationMetadata,
}
