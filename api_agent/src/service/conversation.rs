use base44::{
    dtos::conversation::{ConversationFilter, NewConversation},
    models::conversation::{Conversation, ConversationMetadata, Message},
    store::AgentBackend,
};
use chrono::NaiveDate;
use common::error::{AppError, Res};
use log::info;

pub const NEW_CONVERSATION_DESCRIPTION: &str = "New conversation with AI Assistant";

/// Parameters for a fresh chat, named after the day it was started.
pub fn new_conversation(agent_name: &str, today: NaiveDate) -> NewConversation {
    NewConversation {
        agent_name: agent_name.to_string(),
        metadata: ConversationMetadata {
            name: Some(format!("Chat {}", today.format("%-m/%-d/%Y"))),
            description: Some(NEW_CONVERSATION_DESCRIPTION.to_string()),
        },
    }
}

pub async fn list_conversations<S: AgentBackend>(
    store: &S,
    token: &str,
    agent_name: &str,
) -> Res<Vec<Conversation>> {
    let filter = ConversationFilter {
        agent_name: agent_name.to_string(),
    };
    store.list_conversations(token, &filter).await
}

pub async fn create_conversation<S: AgentBackend>(
    store: &S,
    token: &str,
    agent_name: &str,
    today: NaiveDate,
) -> Res<Conversation> {
    store
        .create_conversation(token, new_conversation(agent_name, today))
        .await
}

/// Appends a user message. Blank input is refused before any backend call.
pub async fn send_message<S: AgentBackend>(
    store: &S,
    token: &str,
    conversation_id: &str,
    content: &str,
) -> Res<Message> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }
    let conversation = store.get_conversation(token, conversation_id).await?;
    let message = store
        .add_message(token, &conversation, Message::user(content))
        .await?;
    info!("Message added to conversation {}", conversation.id);
    Ok(message)
}
