//! Partyline backend library.
//!
//! A party-planning and chat service: the party state engine (membership,
//! requirement fulfilment, budget accounting) behind a REST surface, and a
//! presence-routed messaging dispatcher behind a WebSocket push channel.
//! Layout is hexagonal: `domain` holds aggregates, services, and ports;
//! `inbound` the HTTP and WebSocket adapters; `outbound` the record-store
//! adapters; `server` the wiring.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
