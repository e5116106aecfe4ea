//! HTTP adapter mapping for the API error payload.
//!
//! Keeps the error type HTTP-agnostic while letting Actix handlers turn
//! failures into consistent JSON responses and status codes: 4xx for caller
//! errors, 5xx for internal ones, 503 for retryable collaborator timeouts.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::TRACE_ID_HEADER;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code)
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if matches!(self.code, ErrorCode::InternalError) {
            // Do not leak implementation details to clients.
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to API error");
        Error::internal("Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::service_unavailable("later"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_codes_match_error_codes(#[case] err: Error, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let err = Error::internal("secret detail")
            .with_trace_id("abc")
            .with_details(serde_json::json!({ "secret": true }));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("abc")
        );

        let bytes = to_bytes(response.into_body()).await.expect("body readable");
        let payload: Error = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(payload.message, "Internal server error");
        assert!(payload.details.is_none());
    }

    #[actix_web::test]
    async fn caller_errors_keep_their_message_and_details() {
        let err = Error::conflict("user has already fulfilled this requirement");
        let response = err.error_response();
        let bytes = to_bytes(response.into_body()).await.expect("body readable");
        let payload: Error = serde_json::from_slice(&bytes).expect("error payload");
        assert_eq!(payload.code, ErrorCode::Conflict);
        assert_eq!(payload.message, "user has already fulfilled this requirement");
    }
}
