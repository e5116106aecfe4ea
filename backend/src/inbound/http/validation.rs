//! Request payload parsing helpers shared by HTTP handlers.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Parse an RFC 3339 timestamp, reporting the offending field on failure.
pub fn parse_rfc3339_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            Error::invalid_request(format!("{field} must be an RFC 3339 timestamp")).with_details(
                json!({
                    "field": field,
                    "value": value,
                    "code": "invalid_timestamp",
                }),
            )
        })
}

/// Parse an optional RFC 3339 timestamp.
pub fn parse_optional_rfc3339_timestamp(
    value: Option<&str>,
    field: &str,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}
