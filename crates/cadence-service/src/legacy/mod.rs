//! Mapping of upstream meeting records onto [`MeetingSeries`].

mod record;

pub use record::{LegacyMeeting, LegacyRecurrence, LegacyUpdatedOccurrence};

use crate::error::ServiceResult;
use crate::model::MeetingSeries;

/// ## Summary
/// Builds a [`MeetingSeries`] from an upstream meeting record.
///
/// The id is taken from `meeting_id`, `id` or `uid`, in that order. `topic`
/// and `agenda` fall back to `title` and `description`. Numeric fields may
/// be numbers or numeric strings.
///
/// ## Errors
///
/// Returns an error if the record is not an object, `start_time` is
/// missing or malformed, or a recurrence or updated occurrence is invalid.
pub fn series_from_legacy(value: serde_json::Value) -> ServiceResult<MeetingSeries> {
    let record: LegacyMeeting = serde_json::from_value(value)?;
    MeetingSeries::try_from(record)
}
