use tokio::sync::mpsc;

use crate::models::conversation::Message;

/// A fresh snapshot of a conversation's messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationUpdate {
    pub conversation_id: String,
    pub messages: Vec<Message>,
}

type Cancel = Box<dyn FnOnce() + Send>;

/// Handle on a live conversation subscription.
///
/// Delivery stops as soon as the handle is unsubscribed or dropped; any
/// update still in flight for it is discarded with the receiver.
pub struct Subscription {
    conversation_id: String,
    receiver: mpsc::UnboundedReceiver<ConversationUpdate>,
    cancel: Option<Cancel>,
}

impl Subscription {
    pub fn new(
        conversation_id: impl Into<String>,
        receiver: mpsc::UnboundedReceiver<ConversationUpdate>,
        cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Subscription {
            conversation_id: conversation_id.into(),
            receiver,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Waits for the next update; `None` once the source has stopped.
    pub async fn next(&mut self) -> Option<ConversationUpdate> {
        self.receiver.recv().await
    }

    /// Returns an already delivered update without waiting.
    pub fn try_next(&mut self) -> Option<ConversationUpdate> {
        self.receiver.try_recv().ok()
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            log::debug!("Unsubscribing from conversation {}", self.conversation_id);
            cancel();
        }
        self.receiver.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("conversation_id", &self.conversation_id)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[tokio::test]
    async fn delivers_until_unsubscribed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = cancelled.clone();
        let mut sub = Subscription::new("c1", rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tx.send(ConversationUpdate {
            conversation_id: "c1".to_string(),
            messages: vec![Message::user("hi")],
        })
        .unwrap();
        let update = sub.next().await.unwrap();
        assert_eq!(update.messages.len(), 1);

        sub.unsubscribe();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        assert!(tx.send(ConversationUpdate {
            conversation_id: "c1".to_string(),
            messages: vec![],
        })
        .is_err());
    }

    #[test]
    fn drop_releases_exactly_once() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = cancelled.clone();
        {
            let _sub = Subscription::new("c1", rx, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }
}
