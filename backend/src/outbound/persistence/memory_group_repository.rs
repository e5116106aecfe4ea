//! In-process messaging-group repository adapter.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::group::MessagingGroup;
use crate::domain::ports::{GroupRepository, RecordStoreError};

/// Group store keyed by id, with a name index for send-to-group resolution.
/// Groups share their party's name; the index keeps the most recently
/// created entry per name.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: DashMap<Uuid, MessagingGroup>,
    name_index: DashMap<String, Uuid>,
}

impl InMemoryGroupRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn upsert(&self, group: &MessagingGroup) -> Result<(), RecordStoreError> {
        let already_stored = self.groups.contains_key(&group.id());
        self.groups.insert(group.id(), group.clone());
        if !already_stored {
            self.name_index.insert(group.name().to_owned(), group.id());
        }
        Ok(())
    }

    async fn find(&self, group_id: Uuid) -> Result<Option<MessagingGroup>, RecordStoreError> {
        Ok(self.groups.get(&group_id).map(|entry| entry.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MessagingGroup>, RecordStoreError> {
        let Some(group_id) = self.name_index.get(name).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.groups.get(&group_id).map(|entry| entry.value().clone()))
    }
}
