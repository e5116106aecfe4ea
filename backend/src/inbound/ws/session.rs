//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring chat
//! behaviour to the injected ports. The connection binds to a user through
//! an `identify` frame; presence registration happens there and is undone on
//! every exit path. Failed commands surface as `error` frames and leave the
//! connection open. The public contract pings every 5s and considers a
//! connection idle after 10s without client traffic; tests shorten these
//! intervals to speed up feedback.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::presence::{ConnectionId, PushEvent};
use crate::domain::user::User;
use crate::inbound::ws::messages::{ClientFrame, ServerFrame};
use crate::inbound::ws::state::{WsSink, WsState};

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(state: WsState, session: Session, stream: MessageStream) {
    WsSession::new(state).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    connection: ConnectionId,
    identity: Option<User>,
}

impl WsSession {
    fn new(state: WsState) -> Self {
        Self {
            state,
            connection: ConnectionId::fresh(),
            identity: None,
        }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let (sink, mut pushes) = WsSink::channel();
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let exit = loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                event = pushes.recv() => {
                    self.forward_push(&mut session, event).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, &sink, message)
                        .await
                }
            };

            if let Err(error) = result {
                break error;
            }
        };

        // Presence must be cleared on every exit path so a dead connection
        // never receives further pushes.
        self.state.presence.unregister(self.connection);
        self.log_shutdown_reason(&exit);
        if let CloseAction::Close(reason) = self.close_action_for(&exit) {
            if let Err(error) = session.close(reason).await {
                debug!(error = ?error, "WebSocket close after shutdown failed");
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn forward_push(
        &self,
        session: &mut Session,
        event: Option<PushEvent>,
    ) -> Result<(), SessionError> {
        let Some(event) = event else {
            return Err(SessionError::StreamClosed);
        };
        self.send_frame(session, &ServerFrame::from(event))
            .await
            .map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        sink: &WsSink,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(Message::Ping(payload)) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Ok(Message::Text(text)) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, sink, text.as_ref()).await
            }
            Ok(Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop) => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        sink: &WsSink,
        text: &str,
    ) -> Result<(), SessionError> {
        let frame = match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => frame,
            Err(error) => {
                debug!(error = %error, "rejected malformed WebSocket payload");
                return self
                    .send_frame(session, &ServerFrame::error("invalid payload"))
                    .await
                    .map_err(SessionError::Network);
            }
        };

        let outcome = match frame {
            ClientFrame::Identify { handle } => self.handle_identify(sink, &handle).await,
            ClientFrame::SendMessage {
                recipient,
                group,
                body,
            } => self.handle_send(recipient, group, &body).await,
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(message) => self
                .send_frame(session, &ServerFrame::error(message))
                .await
                .map_err(SessionError::Network),
        }
    }

    /// Bind the connection to a user and register it for pushes. Supplied by
    /// the auth collaborator in the full system; here the client sends the
    /// handle it authenticated as.
    async fn handle_identify(&mut self, sink: &WsSink, handle: &str) -> Result<(), String> {
        let user = self
            .state
            .directory
            .find_by_handle(handle)
            .await
            .map_err(|error| error.to_string())?
            .ok_or_else(|| format!("user {handle} not found"))?;

        self.state
            .presence
            .register(*user.id(), self.connection, sink.clone());
        debug!(user = %user.handle(), connection = %self.connection, "connection identified");
        self.identity = Some(user);
        Ok(())
    }

    async fn handle_send(
        &self,
        recipient: Option<String>,
        group: Option<String>,
        body: &str,
    ) -> Result<(), String> {
        let Some(sender) = self.identity.as_ref() else {
            return Err("identify before sending messages".to_owned());
        };

        let result = match (recipient, group) {
            (Some(recipient), None) => {
                self.state.chat.send_direct(sender, &recipient, body).await
            }
            (None, Some(group)) => self.state.chat.send_to_group(sender, &group, body).await,
            _ => {
                return Err("exactly one of recipient or group must be set".to_owned());
            }
        };
        result.map_err(|error| error.message)
    }

    async fn send_frame(&self, session: &mut Session, frame: &ServerFrame) -> Result<(), Closed> {
        match serde_json::to_string(frame) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                // In debug builds fail fast so schema drift is fixed; in
                // release we log and keep the connection alive.
                if cfg!(debug_assertions) {
                    panic!("server frames must serialise: {error}");
                } else {
                    warn!(error = %error, "failed to serialise WebSocket frame");
                }
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(connection = %self.connection, "WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(connection = %self.connection, error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(connection = %self.connection, error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }
}
