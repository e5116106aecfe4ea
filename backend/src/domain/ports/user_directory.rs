//! Port for the external user directory.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

/// Errors raised by directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// The directory did not answer within its latency bound.
    #[error("user directory unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
}

impl DirectoryError {
    /// Construct a [`DirectoryError::Unavailable`] with context.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Resolve user handles and ids against the external directory.
///
/// Handle lookup is case-insensitive. Both lookups are read-only and must
/// have bounded latency; adapters surface timeouts as
/// [`DirectoryError::Unavailable`], never by blocking indefinitely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by handle.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, DirectoryError>;

    /// Find a user by stable id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;
}
