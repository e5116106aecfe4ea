//! Messaging domain service.
//!
//! Accepts send-intents, persists them, and pushes to online recipients via
//! the presence registry. Sending and party mutation are independent
//! subsystems sharing only identity resolution; nothing here touches party
//! state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::Error;
use crate::domain::message::Message;
use crate::domain::ports::{
    ChatDispatch, ChatHistory, DirectoryError, GroupRepository, MessageRepository, MessageView,
    RecordStoreError, UserDirectory,
};
use crate::domain::presence::{PresenceRegistry, PushEvent, PushSink};
use crate::domain::user::{User, UserId};
use crate::domain::ApiResult;

fn map_store_error(error: RecordStoreError) -> Error {
    Error::service_unavailable(format!("message store unavailable: {error}"))
}

fn map_directory_error(error: DirectoryError) -> Error {
    Error::service_unavailable(format!("user directory unavailable: {error}"))
}

/// Message router over the directory, group, and message ports, pushing to
/// live connections through an injected presence registry.
pub struct MessagingService<D, G, M, C> {
    directory: Arc<D>,
    groups: Arc<G>,
    messages: Arc<M>,
    presence: Arc<PresenceRegistry<C>>,
}

impl<D, G, M, C> MessagingService<D, G, M, C> {
    /// Create the service over its collaborators.
    pub fn new(
        directory: Arc<D>,
        groups: Arc<G>,
        messages: Arc<M>,
        presence: Arc<PresenceRegistry<C>>,
    ) -> Self {
        Self {
            directory,
            groups,
            messages,
            presence,
        }
    }
}

impl<D, G, M, C> MessagingService<D, G, M, C>
where
    C: PushSink,
{
    /// Push to `user` when online. An offline recipient is a normal, silent
    /// outcome: the message is already stored and shows up on the next
    /// history fetch.
    fn push_if_online(&self, user: &UserId, event: &PushEvent) {
        match self.presence.lookup(user) {
            Some(sink) => sink.deliver(event.clone()),
            None => debug!(user = %user, "recipient offline; push skipped"),
        }
    }
}

#[async_trait]
impl<D, G, M, C> ChatDispatch for MessagingService<D, G, M, C>
where
    D: UserDirectory,
    G: GroupRepository,
    M: MessageRepository,
    C: PushSink,
{
    async fn send_direct(
        &self,
        sender: &User,
        recipient_handle: &str,
        body: &str,
    ) -> ApiResult<()> {
        let recipient = self
            .directory
            .find_by_handle(recipient_handle)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("recipient {recipient_handle} not found")))?;

        let message = Message::direct(*sender.id(), *recipient.id(), body);
        self.messages.append(&message).await.map_err(map_store_error)?;

        let event = PushEvent::Direct {
            sender: sender.handle().to_string(),
            recipient: recipient.handle().to_string(),
            body: message.body().to_owned(),
            sent_at: message.sent_at(),
        };
        // Echo to the sender's own connection for UI and multi-tab
        // consistency, then push to the recipient.
        self.push_if_online(sender.id(), &event);
        if recipient.id() != sender.id() {
            self.push_if_online(recipient.id(), &event);
        }
        Ok(())
    }

    async fn send_to_group(&self, sender: &User, group_name: &str, body: &str) -> ApiResult<()> {
        let group = self
            .groups
            .find_by_name(group_name)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("group {group_name} not found")))?;

        let message = Message::group(*sender.id(), group.id(), body);
        self.messages.append(&message).await.map_err(map_store_error)?;

        let event = PushEvent::Group {
            sender: sender.handle().to_string(),
            group: group.name().to_owned(),
            body: message.body().to_owned(),
            sent_at: message.sent_at(),
        };
        // Bounded loop over the mirrored membership; presence lookups are
        // independent and side-effect-free. The sender is part of the
        // fan-out only when also a member.
        for member in group.members() {
            self.push_if_online(member, &event);
        }
        Ok(())
    }
}

#[async_trait]
impl<D, G, M, C> ChatHistory for MessagingService<D, G, M, C>
where
    D: UserDirectory,
    G: GroupRepository,
    M: MessageRepository,
    C: PushSink,
{
    async fn direct_history(
        &self,
        handle_a: &str,
        handle_b: &str,
    ) -> ApiResult<Vec<MessageView>> {
        let a = self
            .directory
            .find_by_handle(handle_a)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {handle_a} not found")))?;
        let b = self
            .directory
            .find_by_handle(handle_b)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {handle_b} not found")))?;

        let messages = self
            .messages
            .direct_history(a.id(), b.id())
            .await
            .map_err(map_store_error)?;

        let handle_of = |id: &UserId| {
            if id == a.id() {
                a.handle().to_string()
            } else {
                b.handle().to_string()
            }
        };

        Ok(messages
            .iter()
            .map(|message| MessageView {
                id: message.id(),
                sender: handle_of(message.sender()),
                recipient: message
                    .recipient()
                    .map(&handle_of)
                    .unwrap_or_default(),
                body: message.body().to_owned(),
                sent_at: message.sent_at(),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
