//! Read-model payloads returned by the driving ports.
//!
//! Views denormalise user ids to display handles at the boundary, matching
//! what clients render. A handle that can no longer be resolved falls back
//! to the raw id string rather than failing the whole read.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::party::{Location, Party, PartyStatus, Requirement};
use crate::domain::user::UserId;

/// Requirement payload with fulfilment handles.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequirementView {
    /// Requirement identity.
    pub id: Uuid,
    /// Item name.
    pub item: String,
    /// Requested quantity.
    pub quantity: u32,
    /// Handles of users who fulfilled this requirement.
    pub fulfilled_by: Vec<String>,
}

/// Party payload with host and participant handles.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartyView {
    /// Party identity.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Host handle.
    pub host: String,
    /// Participant handles, insertion ordered.
    pub participants: Vec<String>,
    /// Venue location.
    pub location: Location,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Remaining pooled budget.
    pub budget: f64,
    /// Lifecycle state.
    pub status: PartyStatus,
    /// Ordered requirement list.
    pub requirements: Vec<RequirementView>,
}

impl PartyView {
    /// Assemble a view from an aggregate and a resolver from user id to
    /// display handle.
    pub fn assemble(party: &Party, mut handle_of: impl FnMut(&UserId) -> String) -> Self {
        Self {
            id: party.id(),
            name: party.name().to_owned(),
            host: handle_of(party.host()),
            participants: party.participants().iter().map(&mut handle_of).collect(),
            location: party.location(),
            start_time: party.start_time(),
            end_time: party.end_time(),
            budget: party.budget(),
            status: party.status(),
            requirements: party
                .requirements()
                .iter()
                .map(|requirement| RequirementView::assemble(requirement, &mut handle_of))
                .collect(),
        }
    }
}

impl RequirementView {
    fn assemble(requirement: &Requirement, mut handle_of: impl FnMut(&UserId) -> String) -> Self {
        Self {
            id: requirement.id(),
            item: requirement.item().to_owned(),
            quantity: requirement.quantity(),
            fulfilled_by: requirement.fulfilled_by().iter().map(&mut handle_of).collect(),
        }
    }
}

/// Direct-message payload for history reads.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message identity.
    pub id: Uuid,
    /// Sender handle.
    pub sender: String,
    /// Recipient handle.
    pub recipient: String,
    /// Message text.
    pub body: String,
    /// Persisted timestamp.
    pub sent_at: DateTime<Utc>,
}
