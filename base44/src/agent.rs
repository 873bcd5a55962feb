use common::error::Res;
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::json;
use tokio::sync::mpsc;

use crate::{
    client::{self, Base44Client},
    dtos::conversation::{ConversationFilter, NewConversation},
    models::conversation::{Conversation, Message},
    store::AgentBackend,
    subscription::{ConversationUpdate, Subscription},
};

const CONVERSATIONS: &str = "agents/conversations";

impl AgentBackend for Base44Client {
    async fn list_conversations(
        &self,
        token: &str,
        filter: &ConversationFilter,
    ) -> Res<Vec<Conversation>> {
        let response = self
            .request(Method::GET, CONVERSATIONS, Some(token))
            .query(&[("agent_name", filter.agent_name.as_str())])
            .send()
            .await?;
        let conversations: Option<Vec<Conversation>> = client::read_json(response).await?;
        Ok(conversations.unwrap_or_default())
    }

    async fn get_conversation(&self, token: &str, id: &str) -> Res<Conversation> {
        self.fetch_conversation(token, id).await
    }

    async fn create_conversation(&self, token: &str, params: NewConversation) -> Res<Conversation> {
        let response = self
            .request(Method::POST, CONVERSATIONS, Some(token))
            .json(&params)
            .send()
            .await?;
        let conversation: Conversation = client::read_json(response).await?;
        info!(
            "Created conversation {} for agent {}",
            conversation.id, params.agent_name
        );
        Ok(conversation)
    }

    async fn add_message(
        &self,
        token: &str,
        conversation: &Conversation,
        message: Message,
    ) -> Res<Message> {
        let response = self
            .request(
                Method::POST,
                &format!("{}/{}/messages", CONVERSATIONS, conversation.id),
                Some(token),
            )
            .json(&json!({ "role": message.role, "content": message.content }))
            .send()
            .await?;
        client::read_json(response).await
    }

    /// Polls the conversation on a background task and forwards every
    /// change of its message list. Aborting the task is the unsubscribe.
    fn subscribe_to_conversation(&self, token: &str, id: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.clone();
        let token = token.to_string();
        let conversation_id = id.to_string();
        let interval = self.poll_interval;

        let task = tokio::spawn(async move {
            let mut last: Option<Vec<Message>> = None;
            loop {
                match client.fetch_conversation(&token, &conversation_id).await {
                    Ok(conversation) => {
                        if last.as_ref() != Some(&conversation.messages) {
                            last = Some(conversation.messages.clone());
                            let update = ConversationUpdate {
                                conversation_id: conversation_id.clone(),
                                messages: conversation.messages,
                            };
                            if tx.send(update).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) if e.is_unauthenticated() => {
                        warn!("Conversation {} subscription lost its session", conversation_id);
                        break;
                    }
                    Err(e) => debug!("Polling conversation {} failed: {}", conversation_id, e),
                }
                if tx.is_closed() {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        });

        let abort = task.abort_handle();
        Subscription::new(id, rx, move || abort.abort())
    }
}

impl Base44Client {
    async fn fetch_conversation(&self, token: &str, id: &str) -> Res<Conversation> {
        let response = self
            .request(Method::GET, &format!("{}/{}", CONVERSATIONS, id), Some(token))
            .send()
            .await?;
        client::read_json(response).await
    }
}
