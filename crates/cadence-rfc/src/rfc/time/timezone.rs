//! Timezone resolution and wall-clock re-anchoring.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::str::FromStr;

use crate::error::{RfcError, RfcResult};

/// ## Summary
/// Resolves a timezone name to a `chrono_tz::Tz`.
///
/// An empty name means UTC. Common non-IANA identifiers are normalized
/// before lookup.
///
/// ## Errors
///
/// Returns `RfcError::UnknownTimezone` if the name cannot be resolved.
pub fn resolve_timezone(name: &str) -> RfcResult<Tz> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Ok(Tz::UTC);
    }

    let normalized = normalize_tzid(trimmed);
    Tz::from_str(&normalized).map_err(|_e| RfcError::UnknownTimezone(name.to_string()))
}

/// Maps the identifiers calendar clients send to canonical IANA names.
///
/// Windows zone names are translated through ICU, and IANA aliases such as
/// `Europe/Kiev` are canonicalized. Unrecognized names pass through.
fn normalize_tzid(tzid: &str) -> String {
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid);

    let iana_parser = IanaParserExtended::new();

    if let Some(zone) = WindowsParser::new().parse(stripped, None)
        && let Some(entry) = iana_parser.iter().find(|entry| entry.time_zone == zone)
    {
        return entry.canonical.to_string();
    }

    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone == icu::time::TimeZone::UNKNOWN {
        stripped.to_string()
    } else {
        parsed.canonical.to_string()
    }
}

/// ## Summary
/// Re-expresses an instant in the named timezone.
///
/// The instant itself is unchanged; only the offset used to present it is.
///
/// ## Errors
///
/// Returns `RfcError::UnknownTimezone` if `name` is non-empty and unresolvable.
pub fn in_location(instant: DateTime<Utc>, name: &str) -> RfcResult<DateTime<Tz>> {
    let tz = resolve_timezone(name)?;
    Ok(instant.with_timezone(&tz))
}

/// ## Summary
/// Converts a local wall-clock time in `tz` to UTC.
///
/// A time repeated by a DST fold resolves to its first occurrence.
///
/// ## Errors
///
/// Returns `RfcError::NonExistentTime` if the time falls in a DST gap.
pub fn local_to_utc(local_time: NaiveDateTime, tz: Tz) -> RfcResult<DateTime<Utc>> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(RfcError::NonExistentTime(format!(
            "{local_time} in timezone {tz}"
        ))),
    }
}

/// ## Summary
/// Lenient version of [`local_to_utc`] that moves a time inside a DST gap
/// forward by one hour instead of failing.
///
/// ## Errors
///
/// Returns `RfcError::NonExistentTime` if the shifted time is still invalid.
pub fn local_to_utc_lenient(local_time: NaiveDateTime, tz: Tz) -> RfcResult<DateTime<Utc>> {
    match local_to_utc(local_time, tz) {
        Err(RfcError::NonExistentTime(_)) => {
            tracing::trace!(%local_time, %tz, "Local time in DST gap, shifting forward");
            local_to_utc(local_time + chrono::TimeDelta::hours(1), tz)
        }
        other => other,
    }
}
