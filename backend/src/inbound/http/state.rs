//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` and depend only on the
//! driving ports, keeping them testable without real storage.

use std::sync::Arc;

use crate::domain::ports::{ChatHistory, PartyCommand, PartyQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Party-mutating use cases.
    pub parties: Arc<dyn PartyCommand>,
    /// Read-only party queries.
    pub party_queries: Arc<dyn PartyQuery>,
    /// Direct-message history reads.
    pub history: Arc<dyn ChatHistory>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        parties: Arc<dyn PartyCommand>,
        party_queries: Arc<dyn PartyQuery>,
        history: Arc<dyn ChatHistory>,
    ) -> Self {
        Self {
            parties,
            party_queries,
            history,
        }
    }
}
