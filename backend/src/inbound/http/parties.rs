//! Party HTTP handlers.
//!
//! ```text
//! POST /api/v1/parties
//! GET  /api/v1/parties/active
//! GET  /api/v1/parties/{partyId}
//! POST /api/v1/parties/{partyId}/join
//! POST /api/v1/parties/{partyId}/leave
//! POST /api/v1/parties/{partyId}/requirements
//! POST /api/v1/parties/{partyId}/requirements/{requirementId}/fulfill
//! PUT  /api/v1/parties/{partyId}
//! POST /api/v1/parties/{partyId}/cancel
//! POST /api/v1/parties/{partyId}/invite
//! GET  /api/v1/users/{handle}/parties
//! GET  /api/v1/users/{handle}/hosted-parties
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::party::{Location, RequirementDraft};
use crate::domain::ports::{CreatePartyRequest, PartyChanges, PartyView};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp,
};

/// Requirement payload supplied by clients.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequirementBody {
    /// Item name.
    pub item: String,
    /// Requested quantity; must be positive.
    pub quantity: u32,
}

impl From<RequirementBody> for RequirementDraft {
    fn from(value: RequirementBody) -> Self {
        Self {
            item: value.item,
            quantity: value.quantity,
        }
    }
}

/// Request payload for creating a party.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartyBody {
    /// Display name; also names the paired messaging group.
    pub name: String,
    /// Handle of the creating user.
    pub host_handle: String,
    /// Initial requirement list.
    #[serde(default)]
    pub requirements: Vec<RequirementBody>,
    /// Venue location.
    pub location: Location,
    /// Scheduled start, RFC 3339.
    #[schema(format = "date-time")]
    pub start_time: String,
    /// Scheduled end, RFC 3339.
    #[schema(format = "date-time")]
    pub end_time: String,
    /// Initial pooled budget; must be non-negative.
    pub budget: f64,
}

/// Body carrying the acting user's handle.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandleBody {
    /// Acting user handle.
    pub handle: String,
}

/// Request payload for fulfilling a requirement.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequirementBody {
    /// Fulfilling user, as a raw id or a handle.
    pub user: String,
    /// Price deducted from the party budget.
    pub price: f64,
}

/// Request payload for host edits. Provided fields fully replace stored
/// ones; omitted fields are untouched.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPartyBody {
    /// Acting user handle; must be the host.
    pub handle: String,
    /// Replacement requirement list.
    pub requirements: Option<Vec<RequirementBody>>,
    /// Replacement start time, RFC 3339.
    #[schema(format = "date-time")]
    pub start_time: Option<String>,
    /// Replacement end time, RFC 3339.
    #[schema(format = "date-time")]
    pub end_time: Option<String>,
}

/// Request payload for host invitations.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteBody {
    /// Acting user handle; must be the host.
    pub handle: String,
    /// Handles to invite. Unknown and already-attending handles are skipped.
    pub invitees: Vec<String>,
}

/// Create a party and its paired messaging group.
#[utoipa::path(
    post,
    path = "/api/v1/parties",
    request_body = CreatePartyBody,
    responses(
        (status = 201, description = "Party created", body = PartyView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Host unknown", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["parties"],
    operation_id = "createParty"
)]
#[post("/parties")]
pub async fn create_party(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePartyBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = CreatePartyRequest {
        start_time: parse_rfc3339_timestamp(&body.start_time, "startTime")?,
        end_time: parse_rfc3339_timestamp(&body.end_time, "endTime")?,
        name: body.name,
        host_handle: body.host_handle,
        requirements: body.requirements.into_iter().map(Into::into).collect(),
        location: body.location,
        budget: body.budget,
    };
    let party = state.parties.create_party(request).await?;
    Ok(HttpResponse::Created().json(party))
}

/// List parties with `status = active`.
#[utoipa::path(
    get,
    path = "/api/v1/parties/active",
    responses(
        (status = 200, description = "Active parties", body = [PartyView]),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["parties"],
    operation_id = "listActiveParties"
)]
#[get("/parties/active")]
pub async fn list_active_parties(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PartyView>>> {
    Ok(web::Json(state.party_queries.list_active().await?))
}

/// Fetch a single party by id.
#[utoipa::path(
    get,
    path = "/api/v1/parties/{partyId}",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    responses(
        (status = 200, description = "Party", body = PartyView),
        (status = 404, description = "Party unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "getParty"
)]
#[get("/parties/{party_id}")]
pub async fn get_party(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<PartyView>> {
    Ok(web::Json(
        state.party_queries.get_party(path.into_inner()).await?,
    ))
}

/// Join a party; idempotent for existing participants.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/join",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = HandleBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 404, description = "Party or user unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "joinParty"
)]
#[post("/parties/{party_id}/join")]
pub async fn join_party(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<HandleBody>,
) -> ApiResult<web::Json<PartyView>> {
    let party = state
        .parties
        .join_party(path.into_inner(), &payload.handle)
        .await?;
    Ok(web::Json(party))
}

/// Leave a party, clearing the user's fulfilments.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/leave",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = HandleBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 400, description = "Not a participant", body = Error),
        (status = 404, description = "Party or user unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "leaveParty"
)]
#[post("/parties/{party_id}/leave")]
pub async fn leave_party(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<HandleBody>,
) -> ApiResult<web::Json<PartyView>> {
    let party = state
        .parties
        .leave_party(path.into_inner(), &payload.handle)
        .await?;
    Ok(web::Json(party))
}

/// Append a requirement to a party.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/requirements",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = RequirementBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 400, description = "Invalid requirement", body = Error),
        (status = 404, description = "Party unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "addRequirement"
)]
#[post("/parties/{party_id}/requirements")]
pub async fn add_requirement(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<RequirementBody>,
) -> ApiResult<web::Json<PartyView>> {
    let party = state
        .parties
        .add_requirement(path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(party))
}

/// Fulfil a requirement, deducting its price from the budget.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/requirements/{requirementId}/fulfill",
    params(
        ("partyId" = Uuid, Path, description = "Party identifier"),
        ("requirementId" = Uuid, Path, description = "Requirement identifier")
    ),
    request_body = FulfillRequirementBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 404, description = "Party, requirement, or user unknown", body = Error),
        (status = 409, description = "Already fulfilled by this user", body = Error)
    ),
    tags = ["parties"],
    operation_id = "fulfillRequirement"
)]
#[post("/parties/{party_id}/requirements/{requirement_id}/fulfill")]
pub async fn fulfill_requirement(
    state: web::Data<HttpState>,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<FulfillRequirementBody>,
) -> ApiResult<web::Json<PartyView>> {
    let (party_id, requirement_id) = path.into_inner();
    let party = state
        .parties
        .fulfill_requirement(party_id, requirement_id, &payload.user, payload.price)
        .await?;
    Ok(web::Json(party))
}

/// Apply host-only edits; provided fields fully replace stored ones.
#[utoipa::path(
    put,
    path = "/api/v1/parties/{partyId}",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = EditPartyBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 403, description = "Acting user is not the host", body = Error),
        (status = 404, description = "Party or user unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "editParty"
)]
#[put("/parties/{party_id}")]
pub async fn edit_party(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<EditPartyBody>,
) -> ApiResult<web::Json<PartyView>> {
    let body = payload.into_inner();
    let changes = PartyChanges {
        requirements: body
            .requirements
            .map(|requirements| requirements.into_iter().map(Into::into).collect()),
        start_time: parse_optional_rfc3339_timestamp(body.start_time.as_deref(), "startTime")?,
        end_time: parse_optional_rfc3339_timestamp(body.end_time.as_deref(), "endTime")?,
    };
    let party = state
        .parties
        .edit_party(path.into_inner(), &body.handle, changes)
        .await?;
    Ok(web::Json(party))
}

/// Cancel a party; host only.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/cancel",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = HandleBody,
    responses(
        (status = 200, description = "Cancelled party", body = PartyView),
        (status = 403, description = "Acting user is not the host", body = Error),
        (status = 404, description = "Party or user unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "cancelParty"
)]
#[post("/parties/{party_id}/cancel")]
pub async fn cancel_party(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<HandleBody>,
) -> ApiResult<web::Json<PartyView>> {
    let party = state
        .parties
        .cancel_party(path.into_inner(), &payload.handle)
        .await?;
    Ok(web::Json(party))
}

/// Invite friends to a party; host only.
#[utoipa::path(
    post,
    path = "/api/v1/parties/{partyId}/invite",
    params(("partyId" = Uuid, Path, description = "Party identifier")),
    request_body = InviteBody,
    responses(
        (status = 200, description = "Updated party", body = PartyView),
        (status = 403, description = "Acting user is not the host", body = Error),
        (status = 404, description = "Party or user unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "inviteFriends"
)]
#[post("/parties/{party_id}/invite")]
pub async fn invite_friends(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<InviteBody>,
) -> ApiResult<web::Json<PartyView>> {
    let body = payload.into_inner();
    let party = state
        .parties
        .invite(path.into_inner(), &body.handle, body.invitees)
        .await?;
    Ok(web::Json(party))
}

/// List parties where the user participates.
#[utoipa::path(
    get,
    path = "/api/v1/users/{handle}/parties",
    params(("handle" = String, Path, description = "User handle")),
    responses(
        (status = 200, description = "Parties", body = [PartyView]),
        (status = 404, description = "User unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "listUserParties"
)]
#[get("/users/{handle}/parties")]
pub async fn list_user_parties(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PartyView>>> {
    Ok(web::Json(
        state.party_queries.list_for_participant(&path).await?,
    ))
}

/// List parties the user hosts.
#[utoipa::path(
    get,
    path = "/api/v1/users/{handle}/hosted-parties",
    params(("handle" = String, Path, description = "User handle")),
    responses(
        (status = 200, description = "Hosted parties", body = [PartyView]),
        (status = 404, description = "User unknown", body = Error)
    ),
    tags = ["parties"],
    operation_id = "listHostedParties"
)]
#[get("/users/{handle}/hosted-parties")]
pub async fn list_hosted_parties(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PartyView>>> {
    Ok(web::Json(state.party_queries.list_hosted(&path).await?))
}
