//! Backend entry-point: wires REST endpoints, the WebSocket push channel,
//! and OpenAPI docs.

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use partyline::ApiDoc;
use partyline::Trace;
use partyline::inbound::http::health::HealthState;
use partyline::server::{self, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let services = server::build_services();
    server::seed_demo_users(&services.directory, &config.seed_users);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let http_state = services.http;
    let ws_state = services.ws;

    info!(bind = %config.bind_addr, "starting server");
    let server = HttpServer::new(move || {
        let app = App::new().wrap(Trace).configure(server::configure_app(
            http_state.clone(),
            ws_state.clone(),
            server_health_state.clone(),
        ));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
