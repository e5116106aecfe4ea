//! In-process message log adapter.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::message::Message;
use crate::domain::ports::{MessageRepository, RecordStoreError};
use crate::domain::user::UserId;

/// Append-only message log. History reads filter and re-sort by timestamp so
/// ordering does not depend on append interleaving.
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &Message) -> Result<(), RecordStoreError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn direct_history(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, RecordStoreError> {
        let messages = self.messages.read().await;
        let mut history: Vec<Message> = messages
            .iter()
            .filter(|message| message.is_direct_between(a, b))
            .cloned()
            .collect();
        history.sort_by_key(Message::sent_at);
        Ok(history)
    }
}
