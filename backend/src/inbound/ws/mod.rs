//! WebSocket inbound adapter: the push channel for chat.
//!
//! Responsibilities:
//! - upgrade `/ws` requests and spawn the per-connection task
//! - bind connections to users via the `identify` frame
//! - keep WebSocket-specific concerns at the edge of the system

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get, rt};
use tracing::error;

mod session;

pub mod messages;
pub mod state;

pub use state::{WsSink, WsState};

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    req: HttpRequest,
    body: Payload,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        err
    })?;

    rt::spawn(session::handle_ws_session(
        state.get_ref().clone(),
        session,
        stream,
    ));

    Ok(response)
}
