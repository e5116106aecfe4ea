//! Port for party persistence.

use async_trait::async_trait;
use uuid::Uuid;

use super::RecordStoreError;
use crate::domain::party::Party;
use crate::domain::user::UserId;

/// Key-based lookup and upsert over party records.
///
/// The repository stores whole aggregates; serialising concurrent mutations
/// of one party is the service's job, not the store's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyRepository: Send + Sync {
    /// Insert or replace a party record.
    async fn upsert(&self, party: &Party) -> Result<(), RecordStoreError>;

    /// Find a party by id.
    async fn find(&self, party_id: Uuid) -> Result<Option<Party>, RecordStoreError>;

    /// List parties with `status = active`.
    async fn list_active(&self) -> Result<Vec<Party>, RecordStoreError>;

    /// List parties where `user` is a participant.
    async fn list_with_participant(&self, user: &UserId) -> Result<Vec<Party>, RecordStoreError>;

    /// List parties hosted by `user`.
    async fn list_hosted_by(&self, user: &UserId) -> Result<Vec<Party>, RecordStoreError>;
}
