//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST surface:
//! party commands and queries, direct-message history, and health probes.
//! The generated document backs Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::ports::{MessageView, PartyView, RequirementView};
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::parties::{
    CreatePartyBody, EditPartyBody, FulfillRequirementBody, HandleBody, InviteBody,
    RequirementBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Partyline backend API",
        description = "HTTP interface for party planning and direct-message history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::parties::create_party,
        crate::inbound::http::parties::list_active_parties,
        crate::inbound::http::parties::get_party,
        crate::inbound::http::parties::join_party,
        crate::inbound::http::parties::leave_party,
        crate::inbound::http::parties::add_requirement,
        crate::inbound::http::parties::fulfill_requirement,
        crate::inbound::http::parties::edit_party,
        crate::inbound::http::parties::cancel_party,
        crate::inbound::http::parties::invite_friends,
        crate::inbound::http::parties::list_user_parties,
        crate::inbound::http::parties::list_hosted_parties,
        crate::inbound::http::messages::direct_message_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PartyView,
        RequirementView,
        MessageView,
        CreatePartyBody,
        RequirementBody,
        HandleBody,
        FulfillRequirementBody,
        EditPartyBody,
        InviteBody,
    )),
    tags(
        (name = "parties", description = "Party planning operations"),
        (name = "messages", description = "Direct-message history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_references_the_party_surface() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/parties"));
        assert!(paths.contains_key("/api/v1/parties/active"));
        assert!(paths.contains_key("/api/v1/messages/{handleA}/{handleB}"));
        assert!(paths.contains_key("/health/ready"));
    }

    #[test]
    fn openapi_document_registers_the_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("PartyView"));
    }
}
