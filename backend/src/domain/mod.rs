//! Domain types, services, and ports.
//!
//! The party aggregate and the messaging dispatcher live here, together with
//! the ports that isolate them from transports and storage. Types are kept
//! transport agnostic; inbound adapters own all wire formats.

pub mod error;
pub mod group;
pub mod message;
pub mod messaging_service;
pub mod party;
pub mod party_service;
pub mod ports;
pub mod presence;
pub mod user;

pub use self::error::{Error, ErrorCode};
pub use self::group::MessagingGroup;
pub use self::message::{Message, MessageScope};
pub use self::messaging_service::MessagingService;
pub use self::party::{
    Location, Party, PartyDraft, PartyMutationError, PartyStatus, PartyValidationError,
    Requirement, RequirementDraft,
};
pub use self::party_service::PartyService;
pub use self::presence::{ConnectionId, PresenceRegistry, PushEvent, PushSink};
pub use self::user::{Handle, User, UserId, UserValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
