//! Splitting a series into pattern segments.

use cadence_rfc::rfc::recurrence::RecurrencePattern;
use chrono::{DateTime, Utc};

use super::id::parse_occurrence_id;
use crate::error::ServiceResult;
use crate::model::MeetingSeries;

/// A run of occurrences governed by one recurrence pattern, from `anchor`
/// up to the next segment's anchor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PatternSegment<'a> {
    pub anchor: DateTime<Utc>,
    pub pattern: &'a RecurrencePattern,
    pub duration_minutes: u32,
    pub topic: &'a str,
    pub agenda: &'a str,
}

/// ## Summary
/// Returns the series' own pattern plus one segment per all-following
/// exception carrying a replacement pattern, sorted by anchor.
///
/// A one-off meeting has no segments.
///
/// ## Errors
///
/// Returns an error if a replacement segment's anchor id is malformed.
pub(crate) fn build_segments(series: &MeetingSeries) -> ServiceResult<Vec<PatternSegment<'_>>> {
    let Some(pattern) = series.recurrence.as_ref() else {
        return Ok(Vec::new());
    };

    let mut segments = vec![PatternSegment {
        anchor: series.start_time,
        pattern,
        duration_minutes: series.duration_minutes,
        topic: &series.topic,
        agenda: &series.agenda,
    }];

    for exception in &series.exceptions {
        let Some(replacement) = exception
            .recurrence
            .as_ref()
            .filter(|_| exception.all_following)
        else {
            continue;
        };

        segments.push(PatternSegment {
            anchor: parse_occurrence_id(exception.effective_new_id())?,
            pattern: replacement,
            duration_minutes: exception
                .duration_override()
                .unwrap_or(series.duration_minutes),
            topic: exception.topic_override().unwrap_or(series.topic.as_str()),
            agenda: exception.agenda_override().unwrap_or(series.agenda.as_str()),
        });
    }

    segments.sort_by_key(|segment| segment.anchor);
    Ok(segments)
}
