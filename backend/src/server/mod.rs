//! Service wiring and app composition.
//!
//! `build_services` assembles adapters into domain services once per
//! process; `configure_app` registers the HTTP and WebSocket surface on an
//! Actix app so the binary and integration tests share one wiring path.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use crate::domain::presence::PresenceRegistry;
use crate::domain::user::User;
use crate::domain::{MessagingService, PartyService};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::{self, HttpState};
use crate::inbound::ws::{self, WsSink, WsState};
use crate::outbound::persistence::{
    InMemoryGroupRepository, InMemoryMessageRepository, InMemoryPartyRepository,
    InMemoryUserDirectory,
};

pub mod config;

pub use config::ServerConfig;

/// Wired dependency bundles for the inbound adapters.
pub struct AppServices {
    /// HTTP handler state.
    pub http: HttpState,
    /// WebSocket handler state.
    pub ws: WsState,
    /// Directory adapter, kept accessible for startup seeding.
    pub directory: Arc<InMemoryUserDirectory>,
}

/// Assemble adapters and domain services.
pub fn build_services() -> AppServices {
    let directory = Arc::new(InMemoryUserDirectory::new());
    let parties = Arc::new(InMemoryPartyRepository::new());
    let groups = Arc::new(InMemoryGroupRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new());
    let presence: Arc<PresenceRegistry<WsSink>> = Arc::new(PresenceRegistry::new());

    let party_service = Arc::new(PartyService::new(
        Arc::clone(&directory),
        parties,
        Arc::clone(&groups),
    ));
    let messaging_service = Arc::new(MessagingService::new(
        Arc::clone(&directory),
        groups,
        messages,
        Arc::clone(&presence),
    ));

    let http = HttpState::new(
        party_service.clone(),
        party_service,
        messaging_service.clone(),
    );
    let ws = WsState::new(messaging_service, directory.clone(), presence);

    AppServices {
        http,
        ws,
        directory,
    }
}

/// Seed demo users into the directory. Invalid handles are skipped with a
/// warning; the external directory owns real user records.
pub fn seed_demo_users(directory: &InMemoryUserDirectory, handles: &[String]) {
    for handle in handles {
        match User::with_handle(handle.clone()) {
            Ok(user) => directory.insert(user),
            Err(error) => {
                warn!(handle = handle.as_str(), error = %error, "skipping invalid seed handle");
            }
        }
    }
    if !handles.is_empty() {
        info!(count = directory.len(), "seeded demo users");
    }
}

/// Register the full inbound surface on an Actix app.
pub fn configure_app(
    http_state: HttpState,
    ws_state: WsState,
    health_state: web::Data<HealthState>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(http_state))
            .app_data(web::Data::new(ws_state))
            .app_data(health_state)
            .service(web::scope("/api/v1").configure(http::configure))
            .service(ws::ws_entry)
            .service(http::health::ready)
            .service(http::health::live);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserDirectory;

    #[tokio::test]
    async fn seeding_inserts_valid_handles_and_skips_invalid_ones() {
        let services = build_services();
        seed_demo_users(
            &services.directory,
            &["ada".to_owned(), "not a handle!".to_owned(), "grace".to_owned()],
        );

        assert_eq!(services.directory.len(), 2);
        assert!(
            services
                .directory
                .find_by_handle("ada")
                .await
                .expect("lookup succeeds")
                .is_some()
        );
    }
}
