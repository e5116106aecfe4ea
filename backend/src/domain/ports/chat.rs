//! Driving ports for chat dispatch and history.

use async_trait::async_trait;

use super::views::MessageView;
use crate::domain::ApiResult;
use crate::domain::user::User;

/// Accept a send-intent, persist it, and push to online recipients.
///
/// Push delivery is fire-and-forget over presence; only storage is durable.
/// An offline recipient is a normal outcome, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatDispatch: Send + Sync {
    /// Send a direct message. The persisted message is echoed to the
    /// sender's own live connection and pushed to the recipient's, when
    /// either is online.
    async fn send_direct(&self, sender: &User, recipient_handle: &str, body: &str)
    -> ApiResult<()>;

    /// Send to a named group, fanning out to every online member. The sender
    /// receives the push only if also a member.
    async fn send_to_group(&self, sender: &User, group_name: &str, body: &str) -> ApiResult<()>;
}

/// Read-only direct-message history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistory: Send + Sync {
    /// All direct messages between the two handles in either direction,
    /// ordered by timestamp ascending. Symmetric in its arguments.
    async fn direct_history(
        &self,
        handle_a: &str,
        handle_b: &str,
    ) -> ApiResult<Vec<MessageView>>;
}
