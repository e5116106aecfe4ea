//! Presence registry.
//!
//! Process-wide mapping from user id to the currently live connection. An
//! injected instance with explicit lifecycle, passed to the message
//! dispatcher as a collaborator; it has no authority over party data and is
//! never persisted. Entries are independent, so a sharded concurrent map
//! supports register/unregister/lookup without locking out delivery.

use std::fmt;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Identity of one live connection. Registration is keyed by user but
/// unregistration by connection, so a stale disconnect can never evict a
/// newer session of the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection identity.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat event pushed to live connections.
///
/// Handles are already denormalised: offline consumers never see these, so
/// there is no later chance to resolve ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Direct message delivery (sender echo and recipient push).
    Direct {
        /// Sender handle.
        sender: String,
        /// Recipient handle.
        recipient: String,
        /// Message text.
        body: String,
        /// Persisted timestamp.
        sent_at: DateTime<Utc>,
    },
    /// Group message fan-out.
    Group {
        /// Sender handle.
        sender: String,
        /// Group name.
        group: String,
        /// Message text.
        body: String,
        /// Persisted timestamp.
        sent_at: DateTime<Utc>,
    },
}

/// Delivery endpoint for one live connection.
///
/// Delivery is fire-and-forget: implementations must not block, and a failed
/// delivery is a normal, silent outcome (the message is already stored).
pub trait PushSink: Clone + Send + Sync + 'static {
    /// Hand the event to the connection.
    fn deliver(&self, event: PushEvent);
}

struct PresenceEntry<C> {
    connection: ConnectionId,
    sink: C,
}

/// Process-wide user-to-connection map.
pub struct PresenceRegistry<C> {
    entries: DashMap<UserId, PresenceEntry<C>>,
}

impl<C> Default for PresenceRegistry<C> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<C: Clone> PresenceRegistry<C> {
    /// Create an empty registry; one instance lives for the whole service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `user` with a connection. Overwrites any prior association:
    /// last connection wins, so a user connected twice only receives pushes
    /// on the newest session.
    pub fn register(&self, user: UserId, connection: ConnectionId, sink: C) {
        self.entries
            .insert(user, PresenceEntry { connection, sink });
    }

    /// Drop whichever entry belongs to `connection`, if any. A no-op when
    /// the user has since re-registered from a newer connection.
    pub fn unregister(&self, connection: ConnectionId) {
        self.entries.retain(|_, entry| entry.connection != connection);
    }

    /// Live sink for `user`, or `None` when offline. Absence means no push
    /// is attempted; there is no offline queue.
    pub fn lookup(&self, user: &UserId) -> Option<C> {
        self.entries.get(user).map(|entry| entry.sink.clone())
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<PushEvent>>>);

    impl PushSink for RecordingSink {
        fn deliver(&self, event: PushEvent) {
            self.0.lock().expect("sink lock").push(event);
        }
    }

    #[test]
    fn lookup_returns_registered_sink() {
        let registry = PresenceRegistry::new();
        let user = UserId::random();
        let sink = RecordingSink::default();
        registry.register(user, ConnectionId::fresh(), sink.clone());

        let found = registry.lookup(&user).expect("registered");
        found.deliver(PushEvent::Direct {
            sender: "ada".into(),
            recipient: "grace".into(),
            body: "hi".into(),
            sent_at: Utc::now(),
        });
        assert_eq!(sink.0.lock().expect("sink lock").len(), 1);
    }

    #[test]
    fn last_connection_wins() {
        let registry: PresenceRegistry<RecordingSink> = PresenceRegistry::new();
        let user = UserId::random();
        let first = ConnectionId::fresh();
        let second = ConnectionId::fresh();
        let newer = RecordingSink::default();
        registry.register(user, first, RecordingSink::default());
        registry.register(user, second, newer.clone());

        assert_eq!(registry.connection_count(), 1);

        // Disconnect of the replaced session must not evict the newer one.
        registry.unregister(first);
        assert!(registry.lookup(&user).is_some());

        registry.unregister(second);
        assert!(registry.lookup(&user).is_none());
    }

    #[test]
    fn lookup_of_unknown_user_is_none() {
        let registry: PresenceRegistry<RecordingSink> = PresenceRegistry::new();
        assert!(registry.lookup(&UserId::random()).is_none());
        assert_eq!(registry.connection_count(), 0);
    }
}
