//! Port for message persistence.

use async_trait::async_trait;

use super::RecordStoreError;
use crate::domain::message::Message;
use crate::domain::user::UserId;

/// Append-only message log with direct-history reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Durably append one message. Each send is a single atomic append.
    async fn append(&self, message: &Message) -> Result<(), RecordStoreError>;

    /// Direct messages between `a` and `b` in either direction, ordered by
    /// timestamp ascending.
    async fn direct_history(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Vec<Message>, RecordStoreError>;
}
