//! In-process user directory adapter.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::ports::{DirectoryError, UserDirectory};
use crate::domain::user::{Handle, User, UserId};

/// Directory backed by concurrent maps, keyed by normalised handle and by
/// id. Stands in for the external identity collaborator.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    by_handle: DashMap<String, User>,
    by_id: DashMap<UserId, User>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub fn insert(&self, user: User) {
        self.by_handle.insert(user.handle().lookup_key(), user.clone());
        self.by_id.insert(*user.id(), user);
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the directory holds no users.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .by_handle
            .get(&Handle::normalise(handle))
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.by_id.get(id).map(|entry| entry.value().clone()))
    }
}
