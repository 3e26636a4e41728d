use cadence_rfc::rfc::recurrence::RecurrencePattern;
use serde::{Deserialize, Serialize};

/// An edit to one occurrence, or to it and every later one.
///
/// Ids are unix-epoch-second strings. Blank overrides fall back to the
/// values in force for the occurrence being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceException {
    pub old_occurrence_id: String,
    #[serde(default)]
    pub new_occurrence_id: String,
    #[serde(default)]
    pub all_following: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agenda: Option<String>,
    /// Replacement pattern; only meaningful with `all_following`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
}

impl OccurrenceException {
    /// Edit to a single occurrence.
    #[must_use]
    pub fn single(old_occurrence_id: impl Into<String>, new_occurrence_id: impl Into<String>) -> Self {
        Self {
            old_occurrence_id: old_occurrence_id.into(),
            new_occurrence_id: new_occurrence_id.into(),
            all_following: false,
            duration_minutes: None,
            topic: None,
            agenda: None,
            recurrence: None,
        }
    }

    /// Edit to an occurrence and all following ones.
    #[must_use]
    pub fn all_following(
        old_occurrence_id: impl Into<String>,
        new_occurrence_id: impl Into<String>,
    ) -> Self {
        Self {
            all_following: true,
            ..Self::single(old_occurrence_id, new_occurrence_id)
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn with_agenda(mut self, agenda: impl Into<String>) -> Self {
        self.agenda = Some(agenda.into());
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, recurrence: RecurrencePattern) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// The new id, or the old one when no move was recorded.
    #[must_use]
    pub fn effective_new_id(&self) -> &str {
        let new_id = self.new_occurrence_id.trim();
        if new_id.is_empty() {
            self.old_occurrence_id.trim()
        } else {
            new_id
        }
    }

    /// True when `occurrence_id` is this exception's old or effective new id.
    #[must_use]
    pub fn matches(&self, occurrence_id: &str) -> bool {
        self.old_occurrence_id.trim() == occurrence_id || self.effective_new_id() == occurrence_id
    }

    /// True for an all-following edit that carries a replacement pattern.
    #[must_use]
    pub const fn starts_segment(&self) -> bool {
        self.all_following && self.recurrence.is_some()
    }

    /// Duration override; zero counts as unset.
    #[must_use]
    pub fn duration_override(&self) -> Option<u32> {
        self.duration_minutes.filter(|&minutes| minutes > 0)
    }

    #[must_use]
    pub fn topic_override(&self) -> Option<&str> {
        non_blank(self.topic.as_deref())
    }

    #[must_use]
    pub fn agenda_override(&self) -> Option<&str> {
        non_blank(self.agenda.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
