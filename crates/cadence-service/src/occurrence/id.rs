//! Occurrence ids are the unix-epoch second of the occurrence start.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ServiceError, ServiceResult};

#[must_use]
pub fn occurrence_id<Z: TimeZone>(start: &DateTime<Z>) -> String {
    start.timestamp().to_string()
}

/// ## Summary
/// Parses an occurrence id back into its start instant.
///
/// ## Errors
///
/// Returns `ServiceError::InvalidOccurrenceId` if the id is not an integer
/// and `ServiceError::InvalidTimestamp` if it is out of chrono's range.
pub fn parse_occurrence_id(id: &str) -> ServiceResult<DateTime<Utc>> {
    let seconds: i64 = id
        .trim()
        .parse()
        .map_err(|e| ServiceError::InvalidOccurrenceId(format!("{id:?}: {e}")))?;
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| ServiceError::InvalidTimestamp(id.to_string()))
}
