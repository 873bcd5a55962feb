//! In-process stand-in for base44, used by tests across the workspace.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;
use common::error::{AppError, Res};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    dtos::{
        conversation::{ConversationFilter, NewConversation},
        key::NewApiKey,
        settings::SiteSettingsData,
        upload::{FileUpload, UploadedFile},
    },
    models::{
        conversation::{Conversation, Message},
        key::ApiKey,
        settings::SiteSettings,
        user::User,
    },
    store::{AgentBackend, AuthBackend, KeyBackend, SettingsBackend, UploadBackend},
    subscription::{ConversationUpdate, Subscription},
};

#[derive(Default)]
struct State {
    offline: bool,
    sessions: HashMap<String, User>,
    keys: HashMap<String, Vec<ApiKey>>,
    settings: Vec<SiteSettings>,
    conversations: Vec<(String, Conversation)>,
    subscribers: HashMap<u64, (String, mpsc::UnboundedSender<ConversationUpdate>)>,
    next_subscriber: u64,
    key_list_calls: usize,
    upload_calls: usize,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as a valid session for `user`.
    pub fn with_session(self, token: &str, user: User) -> Self {
        self.lock().sessions.insert(token.to_string(), user);
        self
    }

    /// Simulates the service being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    pub fn insert_key(&self, email: &str, key: ApiKey) {
        self.lock().keys.entry(email.to_string()).or_default().push(key);
    }

    pub fn insert_conversation(&self, owner: &str, conversation: Conversation) {
        self.lock()
            .conversations
            .push((owner.to_string(), conversation));
    }

    pub fn key_list_calls(&self) -> usize {
        self.lock().key_list_calls
    }

    pub fn upload_calls(&self) -> usize {
        self.lock().upload_calls
    }

    pub fn settings(&self) -> Vec<SiteSettings> {
        self.lock().settings.clone()
    }

    pub fn subscriber_count(&self, conversation_id: &str) -> usize {
        self.lock()
            .subscribers
            .values()
            .filter(|(id, tx)| id == conversation_id && !tx.is_closed())
            .count()
    }

    /// Pushes a snapshot to every live subscriber of `conversation_id` and
    /// returns how many received it.
    pub fn push_update(&self, conversation_id: &str, messages: Vec<Message>) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|_, (_, tx)| !tx.is_closed());
        state
            .subscribers
            .values()
            .filter(|(id, _)| id == conversation_id)
            .filter(|(_, tx)| {
                tx.send(ConversationUpdate {
                    conversation_id: conversation_id.to_string(),
                    messages: messages.clone(),
                })
                .is_ok()
            })
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session(&self, token: &str) -> Res<(MutexGuard<'_, State>, User)> {
        let state = self.lock();
        if state.offline {
            return Err(AppError::service(None));
        }
        let user = state
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Invalid or expired session".to_string()))?;
        Ok((state, user))
    }
}

impl AuthBackend for MemoryBackend {
    async fn me(&self, token: &str) -> Res<User> {
        self.session(token).map(|(_, user)| user)
    }
}

impl KeyBackend for MemoryBackend {
    async fn list_keys(&self, token: &str, order: &str) -> Res<Vec<ApiKey>> {
        let (mut state, user) = self.session(token)?;
        state.key_list_calls += 1;
        let mut keys = state.keys.get(&user.email).cloned().unwrap_or_default();
        match order {
            "-created_date" => keys.sort_by(|a, b| b.created_date.cmp(&a.created_date)),
            "created_date" => keys.sort_by(|a, b| a.created_date.cmp(&b.created_date)),
            _ => {}
        }
        Ok(keys)
    }

    async fn create_key(&self, token: &str, key: NewApiKey) -> Res<ApiKey> {
        let (mut state, user) = self.session(token)?;
        let created = ApiKey {
            id: Uuid::new_v4().to_string(),
            name: key.name,
            environment: key.environment,
            key: key.key,
            status: key.status,
            calls_count: key.calls_count,
            rate_limit: None,
            last_used: None,
            created_date: Utc::now(),
        };
        state
            .keys
            .entry(user.email)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete_key(&self, token: &str, id: &str) -> Res<()> {
        let (mut state, user) = self.session(token)?;
        let keys = state.keys.entry(user.email).or_default();
        let before = keys.len();
        keys.retain(|key| key.id != id);
        if keys.len() == before {
            return Err(AppError::NotFound(format!("ApiKey {} not found", id)));
        }
        Ok(())
    }
}

impl SettingsBackend for MemoryBackend {
    async fn list_settings(&self, _token: Option<&str>) -> Res<Vec<SiteSettings>> {
        let state = self.lock();
        if state.offline {
            return Err(AppError::service(None));
        }
        Ok(state.settings.clone())
    }

    async fn create_settings(&self, token: &str, data: SiteSettingsData) -> Res<SiteSettings> {
        let (mut state, _) = self.session(token)?;
        let settings = SiteSettings {
            id: Uuid::new_v4().to_string(),
            ca_address: Some(data.ca_address),
            x_social_link: Some(data.x_social_link),
            logo_url: Some(data.logo_url),
        };
        state.settings.push(settings.clone());
        Ok(settings)
    }

    async fn update_settings(
        &self,
        token: &str,
        id: &str,
        data: SiteSettingsData,
    ) -> Res<SiteSettings> {
        let (mut state, _) = self.session(token)?;
        let settings = state
            .settings
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("SiteSettings {} not found", id)))?;
        settings.ca_address = Some(data.ca_address);
        settings.x_social_link = Some(data.x_social_link);
        settings.logo_url = Some(data.logo_url);
        Ok(settings.clone())
    }
}

impl UploadBackend for MemoryBackend {
    async fn upload_file(&self, token: &str, file: FileUpload) -> Res<UploadedFile> {
        let (mut state, _) = self.session(token)?;
        state.upload_calls += 1;
        Ok(UploadedFile {
            file_url: format!("https://files.test/{}", file.file_name),
        })
    }
}

impl AgentBackend for MemoryBackend {
    async fn list_conversations(
        &self,
        token: &str,
        filter: &ConversationFilter,
    ) -> Res<Vec<Conversation>> {
        let (state, user) = self.session(token)?;
        Ok(state
            .conversations
            .iter()
            .filter(|(owner, c)| {
                *owner == user.email && c.agent_name.as_deref() == Some(filter.agent_name.as_str())
            })
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn get_conversation(&self, token: &str, id: &str) -> Res<Conversation> {
        let (state, user) = self.session(token)?;
        state
            .conversations
            .iter()
            .find(|(owner, c)| *owner == user.email && c.id == id)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
    }

    async fn create_conversation(&self, token: &str, params: NewConversation) -> Res<Conversation> {
        let (mut state, user) = self.session(token)?;
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            agent_name: Some(params.agent_name),
            metadata: Some(params.metadata),
            messages: Vec::new(),
            created_date: Some(Utc::now()),
        };
        state
            .conversations
            .insert(0, (user.email, conversation.clone()));
        Ok(conversation)
    }

    async fn add_message(
        &self,
        token: &str,
        conversation: &Conversation,
        message: Message,
    ) -> Res<Message> {
        let (mut state, user) = self.session(token)?;
        let (_, stored) = state
            .conversations
            .iter_mut()
            .find(|(owner, c)| *owner == user.email && c.id == conversation.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Conversation {} not found", conversation.id))
            })?;
        let mut message = message;
        message.created_date = Some(Utc::now());
        stored.messages.push(message.clone());
        Ok(message)
    }

    fn subscribe_to_conversation(&self, _token: &str, id: &str) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        let handle = state.next_subscriber;
        state.next_subscriber += 1;
        state.subscribers.insert(handle, (id.to_string(), tx));
        drop(state);

        let backend = self.clone();
        Subscription::new(id, rx, move || {
            backend.lock().subscribers.remove(&handle);
        })
    }
}
