use cadence_core::types::OccurrenceStatus;
use cadence_rfc::rfc::recurrence::RecurrencePattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::duration_string;

/// One concrete meeting instance, in the shape published downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Start time as unix-epoch seconds.
    pub occurrence_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(rename = "duration", with = "duration_string")]
    pub duration_minutes: u32,
    pub status: OccurrenceStatus,
    pub topic: String,
    pub agenda: String,
    /// Set only on the occurrence that opens a new pattern segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
}

impl Occurrence {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time + chrono::TimeDelta::minutes(i64::from(self.duration_minutes))
    }
}
