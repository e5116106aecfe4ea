//! HTTP inbound adapter.
//!
//! Handlers translate JSON bodies into driving-port calls and map domain
//! errors onto status codes. Route registration lives in [`configure`] so
//! the server factory and integration tests wire the same surface.

use actix_web::web;

pub mod error;
pub mod health;
pub mod messages;
pub mod parties;
pub mod state;
pub mod validation;

pub use state::HttpState;

/// Register the `/api/v1` REST surface on a service config.
///
/// `parties/active` is registered ahead of `parties/{party_id}` so the
/// literal segment is not captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(parties::create_party)
        .service(parties::list_active_parties)
        .service(parties::get_party)
        .service(parties::join_party)
        .service(parties::leave_party)
        .service(parties::add_requirement)
        .service(parties::fulfill_requirement)
        .service(parties::edit_party)
        .service(parties::cancel_party)
        .service(parties::invite_friends)
        .service(parties::list_user_parties)
        .service(parties::list_hosted_parties)
        .service(messages::direct_message_history);
}
