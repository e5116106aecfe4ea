//! Wire-level frame definitions for the WebSocket adapter.
//!
//! Client frames arrive as tagged JSON; push events are transformed into
//! server frames before serialisation. The `error` frame reports a failed
//! command without closing the connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::presence::PushEvent;

/// Inbound frames sent by the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientFrame {
    /// Bind this connection to a user; must precede any send.
    Identify {
        /// Handle of the connecting user.
        handle: String,
    },
    /// Send a chat message. Exactly one of `recipient` and `group` is set.
    SendMessage {
        /// Recipient handle for a direct message.
        #[serde(default)]
        recipient: Option<String>,
        /// Group name for a group message.
        #[serde(default)]
        group: Option<String>,
        /// Message text.
        body: String,
    },
}

/// Outbound frames pushed to the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    /// Direct message delivery.
    ReceiveMessage {
        /// Sender handle.
        sender: String,
        /// Recipient handle.
        recipient: String,
        /// Message text.
        body: String,
        /// Persisted timestamp.
        sent_at: DateTime<Utc>,
    },
    /// Group message delivery.
    ReceiveGroupMessage {
        /// Sender handle.
        sender: String,
        /// Group name.
        group: String,
        /// Message text.
        body: String,
        /// Persisted timestamp.
        sent_at: DateTime<Utc>,
    },
    /// A command failed; the connection stays open.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

impl ServerFrame {
    /// Build an error frame.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<PushEvent> for ServerFrame {
    fn from(event: PushEvent) -> Self {
        match event {
            PushEvent::Direct {
                sender,
                recipient,
                body,
                sent_at,
            } => Self::ReceiveMessage {
                sender,
                recipient,
                body,
                sent_at,
            },
            PushEvent::Group {
                sender,
                group,
                body,
                sent_at,
            } => Self::ReceiveGroupMessage {
                sender,
                group,
                body,
                sent_at,
            },
        }
    }
}
