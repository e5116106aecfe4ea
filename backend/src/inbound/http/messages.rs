//! Direct-message history HTTP handler.
//!
//! ```text
//! GET /api/v1/messages/{handleA}/{handleB}
//! ```

use actix_web::{get, web};

use crate::domain::ports::MessageView;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::state::HttpState;

/// Direct messages between two users in either direction, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{handleA}/{handleB}",
    params(
        ("handleA" = String, Path, description = "First user handle"),
        ("handleB" = String, Path, description = "Second user handle")
    ),
    responses(
        (status = 200, description = "Ordered messages", body = [MessageView]),
        (status = 404, description = "Either user unknown", body = Error)
    ),
    tags = ["messages"],
    operation_id = "directMessageHistory"
)]
#[get("/messages/{handle_a}/{handle_b}")]
pub async fn direct_message_history(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<MessageView>>> {
    let (handle_a, handle_b) = path.into_inner();
    Ok(web::Json(
        state.history.direct_history(&handle_a, &handle_b).await?,
    ))
}
