use std::collections::BTreeSet;

use cadence_rfc::rfc::recurrence::RecurrencePattern;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OccurrenceException;

/// A meeting definition with its recurrence and edit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSeries {
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// IANA timezone name; empty means UTC.
    #[serde(default)]
    pub timezone: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub agenda: String,
    /// `None` for a one-off meeting, which has no occurrences.
    #[serde(default)]
    pub recurrence: Option<RecurrencePattern>,
    /// Edits in the order they were recorded.
    #[serde(default)]
    pub exceptions: Vec<OccurrenceException>,
    #[serde(default)]
    pub cancelled_occurrence_ids: BTreeSet<String>,
}

impl MeetingSeries {
    #[must_use]
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            start_time,
            timezone: String::new(),
            duration_minutes,
            topic: String::new(),
            agenda: String::new(),
            recurrence: None,
            exceptions: Vec::new(),
            cancelled_occurrence_ids: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    #[must_use]
    pub fn with_agenda(mut self, agenda: impl Into<String>) -> Self {
        self.agenda = agenda.into();
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, recurrence: RecurrencePattern) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: OccurrenceException) -> Self {
        self.exceptions.push(exception);
        self
    }

    #[must_use]
    pub fn with_cancelled(mut self, occurrence_id: impl Into<String>) -> Self {
        self.cancelled_occurrence_ids.insert(occurrence_id.into());
        self
    }

    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    #[must_use]
    pub fn is_cancelled(&self, occurrence_id: &str) -> bool {
        self.cancelled_occurrence_ids.contains(occurrence_id)
    }
}
