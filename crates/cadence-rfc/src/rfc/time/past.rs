//! Deciding whether an occurrence is over.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// ## Summary
/// Returns true when an occurrence starting at `start` and lasting
/// `duration_minutes` ended more than `end_buffer` before `now`.
///
/// The buffer keeps meetings that overrun their slot visible to
/// upcoming-occurrence queries for a while after their nominal end.
#[must_use]
pub fn is_past<Z: TimeZone>(
    start: &DateTime<Z>,
    duration_minutes: u32,
    end_buffer: TimeDelta,
    now: DateTime<Utc>,
) -> bool {
    let end = start.with_timezone(&Utc) + TimeDelta::minutes(i64::from(duration_minutes));
    end + end_buffer < now
}
