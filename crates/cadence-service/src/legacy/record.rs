//! Upstream meeting records as they arrive on the wire.

use cadence_rfc::rfc::recurrence::{Frequency, RecurrencePattern, parse_weekly_days};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};
use crate::model::wire::NumberOrString;
use crate::model::{MeetingSeries, OccurrenceException};

/// A meeting record from the upstream store. Numbers may arrive as
/// strings and most fields may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyMeeting {
    pub meeting_id: Option<NumberOrString>,
    pub id: Option<NumberOrString>,
    pub uid: Option<NumberOrString>,
    pub start_time: Option<String>,
    pub timezone: Option<String>,
    pub duration: Option<NumberOrString>,
    pub topic: Option<String>,
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<LegacyRecurrence>,
    pub updated_occurrences: Option<Vec<LegacyUpdatedOccurrence>>,
    pub cancelled_occurrences: Option<Vec<NumberOrString>>,
}

/// Recurrence settings. `type` is 1 daily, 2 weekly or 3 monthly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyRecurrence {
    #[serde(rename = "type")]
    pub kind: Option<NumberOrString>,
    pub repeat_interval: Option<NumberOrString>,
    pub weekly_days: Option<NumberOrString>,
    pub monthly_day: Option<NumberOrString>,
    pub monthly_week: Option<NumberOrString>,
    pub monthly_week_day: Option<NumberOrString>,
    pub end_times: Option<NumberOrString>,
    pub end_date_time: Option<String>,
}

/// A recorded edit to one occurrence or to it and all following ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyUpdatedOccurrence {
    pub old_occurrence_id: Option<NumberOrString>,
    pub new_occurrence_id: Option<NumberOrString>,
    pub all_following: Option<bool>,
    pub duration: Option<NumberOrString>,
    pub topic: Option<String>,
    pub title: Option<String>,
    pub agenda: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<LegacyRecurrence>,
}

impl TryFrom<LegacyMeeting> for MeetingSeries {
    type Error = ServiceError;

    fn try_from(record: LegacyMeeting) -> ServiceResult<Self> {
        let id = [&record.meeting_id, &record.id, &record.uid]
            .into_iter()
            .flatten()
            .map(NumberOrString::to_text)
            .find(|id| !id.is_empty())
            .unwrap_or_default();

        let start_text = non_blank(record.start_time)
            .ok_or_else(|| ServiceError::ValidationError(format!("meeting {id}: start_time is required")))?;
        let start_time = parse_timestamp("start_time", &start_text)?;
        let duration_minutes = positive("duration", record.duration.as_ref())?.unwrap_or_default();

        let mut series = Self::new(id, start_time, duration_minutes);
        series.timezone = record.timezone.unwrap_or_default().trim().to_string();
        series.topic = non_blank(record.topic)
            .or_else(|| non_blank(record.title))
            .unwrap_or_default();
        series.agenda = non_blank(record.agenda)
            .or_else(|| non_blank(record.description))
            .unwrap_or_default();
        series.recurrence = record
            .recurrence
            .as_ref()
            .map(LegacyRecurrence::to_pattern)
            .transpose()?;
        series.exceptions = record
            .updated_occurrences
            .unwrap_or_default()
            .into_iter()
            .map(OccurrenceException::try_from)
            .collect::<ServiceResult<_>>()?;
        series.cancelled_occurrence_ids = record
            .cancelled_occurrences
            .unwrap_or_default()
            .iter()
            .map(NumberOrString::to_text)
            .filter(|id| !id.is_empty())
            .collect();

        tracing::trace!(
            meeting_id = %series.id,
            recurring = series.is_recurring(),
            exceptions = series.exceptions.len(),
            cancelled = series.cancelled_occurrence_ids.len(),
            "Mapped upstream meeting record"
        );
        Ok(series)
    }
}

impl TryFrom<LegacyUpdatedOccurrence> for OccurrenceException {
    type Error = ServiceError;

    fn try_from(record: LegacyUpdatedOccurrence) -> ServiceResult<Self> {
        let old_occurrence_id = record
            .old_occurrence_id
            .as_ref()
            .map(NumberOrString::to_text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ServiceError::ValidationError("updated occurrence without old_occurrence_id".to_string())
            })?;
        let new_occurrence_id = record
            .new_occurrence_id
            .as_ref()
            .map(NumberOrString::to_text)
            .unwrap_or_default();

        Ok(Self {
            old_occurrence_id,
            new_occurrence_id,
            all_following: record.all_following.unwrap_or_default(),
            duration_minutes: positive("updated occurrence duration", record.duration.as_ref())?,
            topic: non_blank(record.topic).or_else(|| non_blank(record.title)),
            agenda: non_blank(record.agenda).or_else(|| non_blank(record.description)),
            recurrence: record
                .recurrence
                .as_ref()
                .map(LegacyRecurrence::to_pattern)
                .transpose()?,
        })
    }
}

impl LegacyRecurrence {
    /// ## Summary
    /// Converts the upstream settings into a [`RecurrencePattern`].
    ///
    /// Zero and blank values count as unset. An end date clears the
    /// occurrence count.
    ///
    /// ## Errors
    ///
    /// Returns an error for an unknown recurrence type, a non-numeric
    /// field, a malformed weekday list or an unparseable end date.
    pub fn to_pattern(&self) -> ServiceResult<RecurrencePattern> {
        let kind = integer("type", self.kind.as_ref())?.unwrap_or_default();
        let frequency = Frequency::from_legacy_type(kind)
            .ok_or_else(|| ServiceError::ValidationError(format!("invalid recurrence type {kind}")))?;

        let mut pattern = RecurrencePattern::new(frequency)
            .with_interval(positive("repeat_interval", self.repeat_interval.as_ref())?.unwrap_or(1));

        if let Some(days) = self.weekly_days.as_ref().map(NumberOrString::to_text) {
            pattern = pattern.with_weekdays(parse_weekly_days(&days)?);
        }
        if let Some(day) = positive("monthly_day", self.monthly_day.as_ref())? {
            pattern = pattern.with_month_day(day);
        }

        let week: Option<i8> = narrow("monthly_week", integer("monthly_week", self.monthly_week.as_ref())?)?;
        let weekday: Option<u8> = positive("monthly_week_day", self.monthly_week_day.as_ref())?;
        if let (Some(week), Some(weekday)) = (week, weekday) {
            pattern = pattern.with_month_weekday(week, weekday);
        }

        match non_blank(self.end_date_time.clone()) {
            Some(end) => pattern = pattern.with_until(parse_timestamp("end_date_time", &end)?),
            None => {
                if let Some(count) = positive("end_times", self.end_times.as_ref())? {
                    pattern = pattern.with_count(count);
                }
            }
        }

        Ok(pattern)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_timestamp(field: &str, value: &str) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| ServiceError::InvalidTimestamp(format!("{field} {value:?}: {e}")))
}

/// Reads an integer field; blank and zero count as unset.
fn integer(field: &str, value: Option<&NumberOrString>) -> ServiceResult<Option<i64>> {
    let parsed = value
        .map(NumberOrString::to_i64)
        .transpose()
        .map_err(|text| ServiceError::ValidationError(format!("{field}: {text:?} is not a number")))?;
    Ok(parsed.flatten().filter(|&number| number != 0))
}

/// Reads a non-negative integer field into a narrower type.
fn positive<T: TryFrom<i64>>(field: &str, value: Option<&NumberOrString>) -> ServiceResult<Option<T>> {
    match integer(field, value)? {
        Some(number) if number < 0 => Err(ServiceError::ValidationError(format!(
            "{field}: {number} must not be negative"
        ))),
        other => narrow(field, other),
    }
}

fn narrow<T: TryFrom<i64>>(field: &str, value: Option<i64>) -> ServiceResult<Option<T>> {
    value
        .map(|number| {
            T::try_from(number)
                .map_err(|_e| ServiceError::ValidationError(format!("{field}: {number} is out of range")))
        })
        .transpose()
}
