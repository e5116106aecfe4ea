//! Shared WebSocket adapter state and the connection sink.
//!
//! WebSocket entry points depend on domain ports and the injected presence
//! registry rather than constructing services directly, keeping the
//! per-connection task testable with deterministic doubles.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::ports::{ChatDispatch, UserDirectory};
use crate::domain::presence::{PresenceRegistry, PushEvent, PushSink};

/// Connection handle stored in the presence registry: the sending half of
/// the per-connection push channel.
#[derive(Clone)]
pub struct WsSink {
    tx: mpsc::UnboundedSender<PushEvent>,
}

impl WsSink {
    /// Create a sink and the receiving half drained by the session loop.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PushEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PushSink for WsSink {
    fn deliver(&self, event: PushEvent) {
        // A closed receiver means the connection is already gone; the event
        // is dropped, which is the documented offline outcome.
        let _ = self.tx.send(event);
    }
}

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    /// Send-intent dispatch.
    pub chat: Arc<dyn ChatDispatch>,
    /// Identity resolution for the `identify` step.
    pub directory: Arc<dyn UserDirectory>,
    /// Live-connection registry shared with the dispatcher.
    pub presence: Arc<PresenceRegistry<WsSink>>,
}

impl WsState {
    /// Construct state from explicit collaborators.
    pub fn new(
        chat: Arc<dyn ChatDispatch>,
        directory: Arc<dyn UserDirectory>,
        presence: Arc<PresenceRegistry<WsSink>>,
    ) -> Self {
        Self {
            chat,
            directory,
            presence,
        }
    }
}
