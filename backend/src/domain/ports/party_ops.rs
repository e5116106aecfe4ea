//! Driving ports for party commands and queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::views::PartyView;
use crate::domain::ApiResult;
use crate::domain::party::{Location, RequirementDraft};

/// Input for party creation.
#[derive(Debug, Clone)]
pub struct CreatePartyRequest {
    /// Display name; also names the paired messaging group.
    pub name: String,
    /// Handle of the creating user.
    pub host_handle: String,
    /// Initial requirement list.
    pub requirements: Vec<RequirementDraft>,
    /// Venue location.
    pub location: Location,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Initial pooled budget.
    pub budget: f64,
}

/// Host-supplied edits. Each provided field fully replaces the stored one;
/// omitted fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct PartyChanges {
    /// Replacement requirement list.
    pub requirements: Option<Vec<RequirementDraft>>,
    /// Replacement start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Replacement end time.
    pub end_time: Option<DateTime<Utc>>,
}

impl PartyChanges {
    /// Whether the edit carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Party-mutating use cases.
///
/// Implementations serialise all mutations per party id; concurrent requests
/// against one party cannot lose updates, while different parties never
/// contend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyCommand: Send + Sync {
    /// Create a party and its paired messaging group.
    async fn create_party(&self, request: CreatePartyRequest) -> ApiResult<PartyView>;

    /// Add `handle` to the participant set; idempotent.
    async fn join_party(&self, party_id: Uuid, handle: &str) -> ApiResult<PartyView>;

    /// Remove `handle` from the participant set and its fulfilments.
    async fn leave_party(&self, party_id: Uuid, handle: &str) -> ApiResult<PartyView>;

    /// Append a requirement.
    async fn add_requirement(
        &self,
        party_id: Uuid,
        draft: RequirementDraft,
    ) -> ApiResult<PartyView>;

    /// Record a fulfilment and deduct its price from the budget. `user_ref`
    /// accepts a raw user id or a handle.
    async fn fulfill_requirement(
        &self,
        party_id: Uuid,
        requirement_id: Uuid,
        user_ref: &str,
        price: f64,
    ) -> ApiResult<PartyView>;

    /// Apply host-only edits.
    async fn edit_party(
        &self,
        party_id: Uuid,
        acting_handle: &str,
        changes: PartyChanges,
    ) -> ApiResult<PartyView>;

    /// Host-only cancellation.
    async fn cancel_party(&self, party_id: Uuid, acting_handle: &str) -> ApiResult<PartyView>;

    /// Host-only invitation of the given handles. Handles already attending
    /// and handles the directory does not know are skipped.
    async fn invite(
        &self,
        party_id: Uuid,
        acting_handle: &str,
        invitees: Vec<String>,
    ) -> ApiResult<PartyView>;
}

/// Read-only party queries. No side effects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PartyQuery: Send + Sync {
    /// Parties with `status = active`.
    async fn list_active(&self) -> ApiResult<Vec<PartyView>>;

    /// Parties where `handle` is a participant.
    async fn list_for_participant(&self, handle: &str) -> ApiResult<Vec<PartyView>>;

    /// Parties hosted by `handle`.
    async fn list_hosted(&self, handle: &str) -> ApiResult<Vec<PartyView>>;

    /// Single party by id.
    async fn get_party(&self, party_id: Uuid) -> ApiResult<PartyView>;
}
