//! Party aggregate.
//!
//! A party is a hosted event with participants, a requirement list, and a
//! pooled budget. All invariants live here; services orchestrate ports and
//! locking but never reach into party state directly.
//!
//! ## Invariants
//! - The host is a participant from creation and cannot leave while the
//!   party is active.
//! - `participants` and each requirement's `fulfilled_by` behave as sets: a
//!   user appears at most once.
//! - Requirements are addressed by their own identity, never by position;
//!   an id index is maintained alongside the ordered list.
//! - `status` transitions one way: active → cancelled or active → completed.
//! - The budget is a running total. Fulfilment deducts unconditionally and
//!   may drive it negative; leaving does not refund prior deductions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Geographic point where the party takes place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// Lifecycle state of a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartyStatus {
    /// Accepting joins, fulfilments, and edits.
    Active,
    /// The event took place; terminal.
    Completed,
    /// Soft-deleted by the host; terminal.
    Cancelled,
}

/// Structural validation errors raised when building or editing a party.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyValidationError {
    /// Party name was empty once trimmed.
    #[error("party name must not be empty")]
    EmptyName,
    /// Budget below zero at creation.
    #[error("budget must not be negative")]
    NegativeBudget,
    /// Requirement item name was empty once trimmed.
    #[error("requirement item must not be empty")]
    EmptyItem,
    /// Requirement quantity must be a positive integer.
    #[error("requirement quantity must be at least 1")]
    ZeroQuantity,
}

/// State errors raised by party mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyMutationError {
    /// The user was never a participant.
    #[error("user is not a participant in this party")]
    NotParticipant,
    /// The host stays a participant while the party is active.
    #[error("the host cannot leave an active party")]
    HostCannotLeave,
    /// No requirement with the given id exists.
    #[error("requirement not found")]
    RequirementNotFound,
    /// The user already fulfilled this requirement.
    #[error("user has already fulfilled this requirement")]
    AlreadyFulfilled,
    /// Completed parties cannot be cancelled.
    #[error("a completed party cannot be cancelled")]
    NotCancellable,
}

/// Unvalidated requirement input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementDraft {
    /// Item name; duplicates across requirements are allowed as distinct
    /// demand entries.
    pub item: String,
    /// Positive quantity.
    pub quantity: u32,
}

/// A named, quantified need within a party that participants can fulfil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    id: Uuid,
    item: String,
    quantity: u32,
    fulfilled_by: Vec<UserId>,
}

impl Requirement {
    fn new(draft: RequirementDraft) -> Result<Self, PartyValidationError> {
        if draft.item.trim().is_empty() {
            return Err(PartyValidationError::EmptyItem);
        }
        if draft.quantity == 0 {
            return Err(PartyValidationError::ZeroQuantity);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            item: draft.item,
            quantity: draft.quantity,
            fulfilled_by: Vec::new(),
        })
    }

    /// Requirement identity, stable across list reordering.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Item name.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Requested quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Users who claimed responsibility for this requirement.
    pub fn fulfilled_by(&self) -> &[UserId] {
        &self.fulfilled_by
    }
}

/// Unvalidated party input.
#[derive(Debug, Clone)]
pub struct PartyDraft {
    /// Display name; also names the paired messaging group.
    pub name: String,
    /// Creating user; immutable after creation.
    pub host: UserId,
    /// Initial requirement list.
    pub requirements: Vec<RequirementDraft>,
    /// Venue location.
    pub location: Location,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end. Ordering against `start_time` is not validated;
    /// callers submit what they were given.
    pub end_time: DateTime<Utc>,
    /// Initial pooled budget; must be non-negative.
    pub budget: f64,
}

/// The party aggregate. See the module documentation for invariants.
#[derive(Debug, Clone)]
pub struct Party {
    id: Uuid,
    group_id: Uuid,
    name: String,
    host: UserId,
    participants: Vec<UserId>,
    location: Location,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    budget: f64,
    status: PartyStatus,
    requirements: Vec<Requirement>,
    requirement_index: HashMap<Uuid, usize>,
}

impl Party {
    /// Validate a draft into a new active party hosted (and attended) by
    /// `draft.host`, paired with the messaging group `group_id`.
    pub fn new(id: Uuid, group_id: Uuid, draft: PartyDraft) -> Result<Self, PartyValidationError> {
        if draft.name.trim().is_empty() {
            return Err(PartyValidationError::EmptyName);
        }
        if draft.budget < 0.0 {
            return Err(PartyValidationError::NegativeBudget);
        }

        let mut party = Self {
            id,
            group_id,
            name: draft.name,
            host: draft.host,
            participants: vec![draft.host],
            location: draft.location,
            start_time: draft.start_time,
            end_time: draft.end_time,
            budget: draft.budget,
            status: PartyStatus::Active,
            requirements: Vec::new(),
            requirement_index: HashMap::new(),
        };
        for requirement in draft.requirements {
            party.push_requirement(Requirement::new(requirement)?);
        }
        Ok(party)
    }

    fn push_requirement(&mut self, requirement: Requirement) {
        self.requirement_index
            .insert(requirement.id, self.requirements.len());
        self.requirements.push(requirement);
    }

    /// Party identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identity of the paired messaging group.
    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hosting user.
    pub fn host(&self) -> &UserId {
        &self.host
    }

    /// Participant set, insertion ordered.
    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    /// Venue location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Scheduled start.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Scheduled end.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Remaining pooled budget. May be negative after over-spend.
    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Lifecycle state.
    pub fn status(&self) -> PartyStatus {
        self.status
    }

    /// Ordered requirement list.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Look up a requirement by its own identity.
    pub fn requirement(&self, requirement_id: Uuid) -> Option<&Requirement> {
        self.requirement_index
            .get(&requirement_id)
            .and_then(|&position| self.requirements.get(position))
    }

    /// Whether `user` is currently a participant.
    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// Whether `user` hosts this party.
    pub fn is_hosted_by(&self, user: &UserId) -> bool {
        self.host == *user
    }

    /// Add `user` to the participant set. Idempotent: returns `true` only
    /// when the set changed.
    pub fn join(&mut self, user: UserId) -> bool {
        if self.is_participant(&user) {
            return false;
        }
        self.participants.push(user);
        true
    }

    /// Remove `user` from the participant set and from every requirement's
    /// `fulfilled_by`. Budget already spent on that user's fulfilments is
    /// deliberately not restored (sunk-cost policy).
    pub fn leave(&mut self, user: &UserId) -> Result<(), PartyMutationError> {
        if !self.is_participant(user) {
            return Err(PartyMutationError::NotParticipant);
        }
        if self.is_hosted_by(user) && self.status == PartyStatus::Active {
            return Err(PartyMutationError::HostCannotLeave);
        }
        self.participants.retain(|participant| participant != user);
        for requirement in &mut self.requirements {
            requirement.fulfilled_by.retain(|fulfiller| fulfiller != user);
        }
        Ok(())
    }

    /// Append a new requirement with an empty `fulfilled_by` set. Item names
    /// are not deduplicated; two requirements for the same item are distinct
    /// demand entries.
    pub fn add_requirement(
        &mut self,
        draft: RequirementDraft,
    ) -> Result<Uuid, PartyValidationError> {
        let requirement = Requirement::new(draft)?;
        let requirement_id = requirement.id;
        self.push_requirement(requirement);
        Ok(requirement_id)
    }

    /// Record that `user` fulfils the requirement and deduct `price` from
    /// the budget.
    ///
    /// The deduction is unconditional: there is no budget floor, and the
    /// fulfilling user is not required to be a participant. Both are
    /// observed behaviour of the system this implements, kept as-is.
    pub fn fulfill_requirement(
        &mut self,
        requirement_id: Uuid,
        user: UserId,
        price: f64,
    ) -> Result<(), PartyMutationError> {
        let position = *self
            .requirement_index
            .get(&requirement_id)
            .ok_or(PartyMutationError::RequirementNotFound)?;
        let requirement = self
            .requirements
            .get_mut(position)
            .ok_or(PartyMutationError::RequirementNotFound)?;
        if requirement.fulfilled_by.contains(&user) {
            return Err(PartyMutationError::AlreadyFulfilled);
        }
        requirement.fulfilled_by.push(user);
        self.budget -= price;
        Ok(())
    }

    /// Replace the whole requirement list. Existing fulfilments are
    /// discarded with the old entries; provided fields fully replace stored
    /// ones, they are never merged.
    pub fn replace_requirements(
        &mut self,
        drafts: Vec<RequirementDraft>,
    ) -> Result<(), PartyValidationError> {
        let mut replacement = Vec::with_capacity(drafts.len());
        for draft in drafts {
            replacement.push(Requirement::new(draft)?);
        }
        self.requirements.clear();
        self.requirement_index.clear();
        for requirement in replacement {
            self.push_requirement(requirement);
        }
        Ok(())
    }

    /// Replace the scheduled start.
    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.start_time = start_time;
    }

    /// Replace the scheduled end.
    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) {
        self.end_time = end_time;
    }

    /// Cancel the party. Cancelling an already-cancelled party succeeds
    /// silently; completed parties stay completed.
    pub fn cancel(&mut self) -> Result<(), PartyMutationError> {
        if self.status == PartyStatus::Completed {
            return Err(PartyMutationError::NotCancellable);
        }
        self.status = PartyStatus::Cancelled;
        Ok(())
    }
}
