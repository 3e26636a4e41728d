//! Weekday index helpers. Indexes run from 1 (Sunday) to 7 (Saturday).

use crate::error::{RfcError, RfcResult};

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// Returns the two-letter RFC 5545 code for a weekday index, or `None`
/// outside 1–7.
#[must_use]
pub fn weekday_abbrev(index: u8) -> Option<&'static str> {
    let slot = usize::from(index).checked_sub(1)?;
    WEEKDAY_ABBREVIATIONS.get(slot).copied()
}

/// Maps a list of weekday indexes to their codes, dropping invalid ones.
#[must_use]
pub fn weekday_abbrevs(indexes: &[u8]) -> Vec<&'static str> {
    indexes
        .iter()
        .filter_map(|&index| {
            let abbrev = weekday_abbrev(index);
            if abbrev.is_none() {
                tracing::trace!(index, "Dropping weekday index outside 1-7");
            }
            abbrev
        })
        .collect()
}

/// ## Summary
/// Parses a comma-separated weekday list such as `"2,3,6"`.
///
/// Numbers outside 1–7 are dropped. Blank input yields an empty list.
///
/// ## Errors
///
/// Returns `RfcError::InvalidWeekdayList` if an item is not an integer.
pub fn parse_weekly_days(days: &str) -> RfcResult<Vec<u8>> {
    if days.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parsed = Vec::new();
    for item in days.split(',') {
        let number: i64 = item
            .trim()
            .parse()
            .map_err(|err| RfcError::InvalidWeekdayList(format!("{days:?}: {err}")))?;
        match u8::try_from(number) {
            Ok(index @ 1..=7) => parsed.push(index),
            _ => tracing::trace!(number, "Dropping weekday number outside 1-7"),
        }
    }
    Ok(parsed)
}
