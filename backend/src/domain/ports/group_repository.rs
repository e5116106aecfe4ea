//! Port for messaging-group persistence.

use async_trait::async_trait;
use uuid::Uuid;

use super::RecordStoreError;
use crate::domain::group::MessagingGroup;

/// Key-based lookup and upsert over messaging-group records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Insert or replace a group record.
    async fn upsert(&self, group: &MessagingGroup) -> Result<(), RecordStoreError>;

    /// Find a group by id.
    async fn find(&self, group_id: Uuid) -> Result<Option<MessagingGroup>, RecordStoreError>;

    /// Find a group by name. Groups share their party's name; when several
    /// match, adapters return the most recently created one.
    async fn find_by_name(&self, name: &str) -> Result<Option<MessagingGroup>, RecordStoreError>;
}
