use base44::{
    models::conversation::{Conversation, Message},
    store::AgentBackend,
    subscription::{ConversationUpdate, Subscription},
};
use common::error::Res;
use log::debug;

/// The conversation currently on screen and the live subscription feeding it.
///
/// At most one subscription is held. Opening another conversation releases
/// the previous one first, and updates for any other conversation are
/// dropped, so a late snapshot of an old chat never replaces the messages
/// of the one being displayed.
pub struct ConversationView<B> {
    backend: B,
    token: String,
    current: Option<Conversation>,
    subscription: Option<Subscription>,
}

impl<B: AgentBackend> ConversationView<B> {
    pub fn new(backend: B, token: impl Into<String>) -> Self {
        ConversationView {
            backend,
            token: token.into(),
            current: None,
            subscription: None,
        }
    }

    /// Switches the view to `id`: unsubscribe, load, then subscribe.
    pub async fn open(&mut self, id: &str) -> Res<&Conversation> {
        self.close();
        let conversation = self.backend.get_conversation(&self.token, id).await?;
        self.subscription = Some(
            self.backend
                .subscribe_to_conversation(&self.token, &conversation.id),
        );
        Ok(&*self.current.insert(conversation))
    }

    /// Releases the subscription and clears the view.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.current = None;
    }

    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }

    pub fn messages(&self) -> &[Message] {
        self.current
            .as_ref()
            .map(|c| c.messages.as_slice())
            .unwrap_or_default()
    }

    /// Applies a snapshot; returns whether the displayed messages changed.
    pub fn apply(&mut self, update: ConversationUpdate) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        if current.id != update.conversation_id {
            debug!(
                "Ignoring update for {} while {} is open",
                update.conversation_id, current.id
            );
            return false;
        }
        if current.messages == update.messages {
            return false;
        }
        current.messages = update.messages;
        true
    }

    /// Waits for the next delivered snapshot and applies it. `None` once
    /// nothing is subscribed or the source has stopped.
    pub async fn next_update(&mut self) -> Option<bool> {
        let update = self.subscription.as_mut()?.next().await?;
        Some(self.apply(update))
    }

    /// Applies every snapshot already delivered; returns how many changed
    /// the view.
    pub fn drain_updates(&mut self) -> usize {
        let mut changed = 0;
        while let Some(update) = self.subscription.as_mut().and_then(Subscription::try_next) {
            if self.apply(update) {
                changed += 1;
            }
        }
        changed
    }
}
