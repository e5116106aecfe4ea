//! In-process party repository adapter.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::party::{Party, PartyStatus};
use crate::domain::ports::{PartyRepository, RecordStoreError};
use crate::domain::user::UserId;

/// Party store backed by a concurrent map keyed by party id.
#[derive(Default)]
pub struct InMemoryPartyRepository {
    parties: DashMap<Uuid, Party>,
}

impl InMemoryPartyRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_filtered(&self, predicate: impl Fn(&Party) -> bool) -> Vec<Party> {
        self.parties
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl PartyRepository for InMemoryPartyRepository {
    async fn upsert(&self, party: &Party) -> Result<(), RecordStoreError> {
        self.parties.insert(party.id(), party.clone());
        Ok(())
    }

    async fn find(&self, party_id: Uuid) -> Result<Option<Party>, RecordStoreError> {
        Ok(self.parties.get(&party_id).map(|entry| entry.value().clone()))
    }

    async fn list_active(&self) -> Result<Vec<Party>, RecordStoreError> {
        Ok(self.collect_filtered(|party| party.status() == PartyStatus::Active))
    }

    async fn list_with_participant(&self, user: &UserId) -> Result<Vec<Party>, RecordStoreError> {
        Ok(self.collect_filtered(|party| party.is_participant(user)))
    }

    async fn list_hosted_by(&self, user: &UserId) -> Result<Vec<Party>, RecordStoreError> {
        Ok(self.collect_filtered(|party| party.is_hosted_by(user)))
    }
}
