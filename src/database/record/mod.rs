//! Database records, the SQLite representation of the domain entities.

mod approved_certificate_record;
mod pending_certificate_record;

pub use approved_certificate_record::ApprovedCertificateRecord;
pub use pending_certificate_record::PendingCertificateRecord;

use chrono::{DateTime, NaiveDate, Utc};

use crate::sqlite::HydrationError;

/// Parse an ISO 8601 calendar date stored in a text column.
pub(crate) fn hydrate_issue_date(field: &str, value: &str) -> Result<NaiveDate, HydrationError> {
    value
        .parse::<NaiveDate>()
        .map_err(|e| HydrationError::InvalidData(format!("{field}: could not parse date: {e}")))
}

/// Parse an RFC 3339 timestamp stored in a text column.
pub(crate) fn hydrate_timestamp(
    field: &str,
    value: &str,
) -> Result<DateTime<Utc>, HydrationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HydrationError::InvalidData(format!("{field}: could not parse timestamp: {e}")))
}

/// Parse a JSON text column into a deserializable type.
pub(crate) fn hydrate_json<T: serde::de::DeserializeOwned>(
    field: &str,
    value: &str,
) -> Result<T, HydrationError> {
    serde_json::from_str(value)
        .map_err(|e| HydrationError::InvalidData(format!("{field}: could not parse json: {e}")))
}
