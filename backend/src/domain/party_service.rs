//! Party domain service.
//!
//! Implements the party command and query ports over the directory and
//! repository ports, keeps the paired messaging group's membership mirrored
//! on every participant-adding mutation, and serialises mutations per party
//! id so concurrent requests cannot lose updates on participants,
//! fulfilments, or the budget.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::group::MessagingGroup;
use crate::domain::party::{
    Party, PartyDraft, PartyMutationError, PartyValidationError, RequirementDraft,
};
use crate::domain::ports::{
    CreatePartyRequest, DirectoryError, GroupRepository, PartyChanges, PartyCommand, PartyQuery,
    PartyRepository, PartyView, RecordStoreError, UserDirectory,
};
use crate::domain::user::{User, UserId};
use crate::domain::ApiResult;

fn map_store_error(error: RecordStoreError) -> Error {
    Error::service_unavailable(format!("party store unavailable: {error}"))
}

fn map_directory_error(error: DirectoryError) -> Error {
    Error::service_unavailable(format!("user directory unavailable: {error}"))
}

fn map_validation_error(error: PartyValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn map_mutation_error(error: PartyMutationError) -> Error {
    match error {
        PartyMutationError::NotParticipant => Error::invalid_request(error.to_string()),
        PartyMutationError::HostCannotLeave => Error::forbidden(error.to_string()),
        PartyMutationError::RequirementNotFound => Error::not_found(error.to_string()),
        PartyMutationError::AlreadyFulfilled | PartyMutationError::NotCancellable => {
            Error::conflict(error.to_string())
        }
    }
}

/// Party service implementing the command and query driving ports.
pub struct PartyService<D, P, G> {
    directory: Arc<D>,
    parties: Arc<P>,
    groups: Arc<G>,
    // One async mutex per party id. Guards are acquired before any
    // read-modify-write and released on every exit path when dropped.
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl<D, P, G> PartyService<D, P, G> {
    /// Create the service over its collaborator ports.
    pub fn new(directory: Arc<D>, parties: Arc<P>, groups: Arc<G>) -> Self {
        Self {
            directory,
            parties,
            groups,
            locks: DashMap::new(),
        }
    }

    async fn lock_party(&self, party_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let entry = self.locks.entry(party_id).or_default();
            Arc::clone(entry.value())
        };
        lock.lock_owned().await
    }
}

impl<D, P, G> PartyService<D, P, G>
where
    D: UserDirectory,
    P: PartyRepository,
    G: GroupRepository,
{
    async fn resolve_handle(&self, handle: &str) -> ApiResult<User> {
        self.directory
            .find_by_handle(handle)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found(format!("user {handle} not found")))
    }

    /// Accept a raw user id or a handle, per the fulfilment contract.
    async fn resolve_user_ref(&self, user_ref: &str) -> ApiResult<User> {
        if let Ok(id) = user_ref.parse::<UserId>() {
            return self
                .directory
                .find_by_id(&id)
                .await
                .map_err(map_directory_error)?
                .ok_or_else(|| Error::not_found(format!("user {user_ref} not found")));
        }
        self.resolve_handle(user_ref).await
    }

    async fn load_party(&self, party_id: Uuid) -> ApiResult<Party> {
        self.parties
            .find(party_id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("party not found"))
    }

    async fn require_host(&self, party: &Party, acting_handle: &str, action: &str) -> ApiResult<User> {
        let acting = self.resolve_handle(acting_handle).await?;
        if !party.is_hosted_by(acting.id()) {
            return Err(Error::forbidden(format!(
                "only the host can {action} this party"
            )));
        }
        Ok(acting)
    }

    /// Mirror participant additions into the paired messaging group. Absence
    /// of the group record is logged, not fatal: chat delivery degrades but
    /// the party mutation has already been decided.
    async fn mirror_additions(&self, party: &Party, added: &[UserId]) -> ApiResult<()> {
        if added.is_empty() {
            return Ok(());
        }
        match self
            .groups
            .find(party.group_id())
            .await
            .map_err(map_store_error)?
        {
            Some(mut group) => {
                group.add_members(added);
                self.groups.upsert(&group).await.map_err(map_store_error)
            }
            None => {
                warn!(party_id = %party.id(), group_id = %party.group_id(), "paired messaging group missing; skipping membership mirror");
                Ok(())
            }
        }
    }

    async fn view(&self, party: &Party) -> ApiResult<PartyView> {
        fn push_unique(ids: &mut Vec<UserId>, id: &UserId) {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        let mut ids: Vec<UserId> = Vec::new();
        push_unique(&mut ids, party.host());
        for participant in party.participants() {
            push_unique(&mut ids, participant);
        }
        for requirement in party.requirements() {
            for fulfiller in requirement.fulfilled_by() {
                push_unique(&mut ids, fulfiller);
            }
        }

        let mut handles: HashMap<UserId, String> = HashMap::with_capacity(ids.len());
        for id in ids {
            let handle = self
                .directory
                .find_by_id(&id)
                .await
                .map_err(map_directory_error)?
                .map(|user| user.handle().to_string())
                // A user the directory no longer knows still appears in
                // stored records; fall back to the raw id.
                .unwrap_or_else(|| id.to_string());
            handles.insert(id, handle);
        }

        Ok(PartyView::assemble(party, |id| {
            handles
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string())
        }))
    }

    async fn views(&self, parties: Vec<Party>) -> ApiResult<Vec<PartyView>> {
        let mut result = Vec::with_capacity(parties.len());
        for party in &parties {
            result.push(self.view(party).await?);
        }
        Ok(result)
    }
}

#[async_trait]
impl<D, P, G> PartyCommand for PartyService<D, P, G>
where
    D: UserDirectory,
    P: PartyRepository,
    G: GroupRepository,
{
    async fn create_party(&self, request: CreatePartyRequest) -> ApiResult<PartyView> {
        let host = self.resolve_handle(&request.host_handle).await?;
        let group_id = Uuid::new_v4();
        let party = Party::new(
            Uuid::new_v4(),
            group_id,
            PartyDraft {
                name: request.name,
                host: *host.id(),
                requirements: request.requirements,
                location: request.location,
                start_time: request.start_time,
                end_time: request.end_time,
                budget: request.budget,
            },
        )
        .map_err(map_validation_error)?;

        self.parties.upsert(&party).await.map_err(map_store_error)?;
        let group = MessagingGroup::new(group_id, party.name(), vec![*host.id()]);
        self.groups.upsert(&group).await.map_err(map_store_error)?;

        info!(party_id = %party.id(), host = %host.handle(), "party created");
        self.view(&party).await
    }

    async fn join_party(&self, party_id: Uuid, handle: &str) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        let user = self.resolve_handle(handle).await?;

        if party.join(*user.id()) {
            self.parties.upsert(&party).await.map_err(map_store_error)?;
            self.mirror_additions(&party, &[*user.id()]).await?;
        }
        self.view(&party).await
    }

    async fn leave_party(&self, party_id: Uuid, handle: &str) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        let user = self.resolve_handle(handle).await?;

        party.leave(user.id()).map_err(map_mutation_error)?;
        self.parties.upsert(&party).await.map_err(map_store_error)?;
        // Group membership is deliberately not mirrored on leave: the user
        // keeps receiving this party's group messages.
        self.view(&party).await
    }

    async fn add_requirement(
        &self,
        party_id: Uuid,
        draft: RequirementDraft,
    ) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        party.add_requirement(draft).map_err(map_validation_error)?;
        self.parties.upsert(&party).await.map_err(map_store_error)?;
        self.view(&party).await
    }

    async fn fulfill_requirement(
        &self,
        party_id: Uuid,
        requirement_id: Uuid,
        user_ref: &str,
        price: f64,
    ) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        let user = self.resolve_user_ref(user_ref).await?;

        party
            .fulfill_requirement(requirement_id, *user.id(), price)
            .map_err(map_mutation_error)?;
        self.parties.upsert(&party).await.map_err(map_store_error)?;

        info!(party_id = %party.id(), requirement_id = %requirement_id, user = %user.handle(), price, budget = party.budget(), "requirement fulfilled");
        self.view(&party).await
    }

    async fn edit_party(
        &self,
        party_id: Uuid,
        acting_handle: &str,
        changes: PartyChanges,
    ) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        self.require_host(&party, acting_handle, "edit").await?;

        if let Some(requirements) = changes.requirements {
            party
                .replace_requirements(requirements)
                .map_err(map_validation_error)?;
        }
        if let Some(start_time) = changes.start_time {
            party.set_start_time(start_time);
        }
        if let Some(end_time) = changes.end_time {
            party.set_end_time(end_time);
        }

        self.parties.upsert(&party).await.map_err(map_store_error)?;
        self.view(&party).await
    }

    async fn cancel_party(&self, party_id: Uuid, acting_handle: &str) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        self.require_host(&party, acting_handle, "cancel").await?;

        party.cancel().map_err(map_mutation_error)?;
        self.parties.upsert(&party).await.map_err(map_store_error)?;

        info!(party_id = %party.id(), "party cancelled");
        self.view(&party).await
    }

    async fn invite(
        &self,
        party_id: Uuid,
        acting_handle: &str,
        invitees: Vec<String>,
    ) -> ApiResult<PartyView> {
        let _guard = self.lock_party(party_id).await;
        let mut party = self.load_party(party_id).await?;
        self.require_host(&party, acting_handle, "invite friends to").await?;

        let mut added = Vec::new();
        for invitee in &invitees {
            let Some(user) = self
                .directory
                .find_by_handle(invitee)
                .await
                .map_err(map_directory_error)?
            else {
                // Unknown handles are skipped, matching the filter-style
                // resolution of the invite contract.
                continue;
            };
            if party.join(*user.id()) {
                added.push(*user.id());
            }
        }

        if !added.is_empty() {
            self.parties.upsert(&party).await.map_err(map_store_error)?;
            self.mirror_additions(&party, &added).await?;
        }
        self.view(&party).await
    }
}

#[async_trait]
impl<D, P, G> PartyQuery for PartyService<D, P, G>
where
    D: UserDirectory,
    P: PartyRepository,
    G: GroupRepository,
{
    async fn list_active(&self) -> ApiResult<Vec<PartyView>> {
        let parties = self.parties.list_active().await.map_err(map_store_error)?;
        self.views(parties).await
    }

    async fn list_for_participant(&self, handle: &str) -> ApiResult<Vec<PartyView>> {
        let user = self.resolve_handle(handle).await?;
        let parties = self
            .parties
            .list_with_participant(user.id())
            .await
            .map_err(map_store_error)?;
        self.views(parties).await
    }

    async fn list_hosted(&self, handle: &str) -> ApiResult<Vec<PartyView>> {
        let user = self.resolve_handle(handle).await?;
        let parties = self
            .parties
            .list_hosted_by(user.id())
            .await
            .map_err(map_store_error)?;
        self.views(parties).await
    }

    async fn get_party(&self, party_id: Uuid) -> ApiResult<PartyView> {
        let party = self.load_party(party_id).await?;
        self.view(&party).await
    }
}

#[cfg(test)]
#[path = "party_service_tests.rs"]
mod tests;
