//! Chat message records.
//!
//! Messages are immutable once created. Exactly one of `recipient` and
//! `group_id` is set, captured by [`MessageScope`]. Storage is the
//! durability story; push delivery is best-effort and never retried.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    /// Direct message to a single recipient.
    Direct(UserId),
    /// Message to a messaging group.
    Group(Uuid),
}

/// Immutable chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: Uuid,
    sender: UserId,
    scope: MessageScope,
    body: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a direct message.
    pub fn direct(sender: UserId, recipient: UserId, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            scope: MessageScope::Direct(recipient),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    /// Create a group message.
    pub fn group(sender: UserId, group_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            scope: MessageScope::Group(group_id),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    /// Message identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sending user.
    pub fn sender(&self) -> &UserId {
        &self.sender
    }

    /// Conversation scope.
    pub fn scope(&self) -> MessageScope {
        self.scope
    }

    /// Recipient for direct messages, `None` for group messages.
    pub fn recipient(&self) -> Option<&UserId> {
        match &self.scope {
            MessageScope::Direct(recipient) => Some(recipient),
            MessageScope::Group(_) => None,
        }
    }

    /// Message text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp; history ordering key.
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Whether this is a direct message between `a` and `b`, in either
    /// direction.
    pub fn is_direct_between(&self, a: &UserId, b: &UserId) -> bool {
        match &self.scope {
            MessageScope::Direct(recipient) => {
                (self.sender == *a && recipient == b) || (self.sender == *b && recipient == a)
            }
            MessageScope::Group(_) => false,
        }
    }
}
