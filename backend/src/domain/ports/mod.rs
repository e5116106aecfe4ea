//! Domain ports.
//!
//! Driving ports (`PartyCommand`, `PartyQuery`, `ChatDispatch`,
//! `ChatHistory`) are the use-case surface inbound adapters depend on.
//! Driven ports (`UserDirectory`, `PartyRepository`, `GroupRepository`,
//! `MessageRepository`) abstract the external record store and user
//! directory; outbound adapters implement them.

pub mod chat;
pub mod group_repository;
pub mod message_repository;
pub mod party_ops;
pub mod party_repository;
pub mod user_directory;
pub mod views;

pub use chat::{ChatDispatch, ChatHistory};
pub use group_repository::GroupRepository;
pub use message_repository::MessageRepository;
pub use party_ops::{CreatePartyRequest, PartyChanges, PartyCommand, PartyQuery};
pub use party_repository::PartyRepository;
pub use user_directory::{DirectoryError, UserDirectory};
pub use views::{MessageView, PartyView, RequirementView};

/// Errors raised by record-store adapters.
///
/// The store is an external collaborator reached by key lookup and upsert;
/// the only failure it surfaces here is bounded-latency unavailability,
/// which services map to a retryable API error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordStoreError {
    /// The store did not answer within its latency bound.
    #[error("record store unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
}

impl RecordStoreError {
    /// Construct a [`RecordStoreError::Unavailable`] with context.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
