//! Typed recurrence patterns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RfcError, RfcResult};

/// How often a series repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Maps the numeric recurrence type used by upstream records
    /// (1 daily, 2 weekly, 3 monthly).
    #[must_use]
    pub const fn from_legacy_type(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Daily),
            2 => Some(Self::Weekly),
            3 => Some(Self::Monthly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_rrule_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }
}

/// "The Nth weekday of the month". `week` is 1–5, or -1 to -5 counting
/// back from the end of the month. `weekday` is 1 (Sunday) to 7 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthlyWeekday {
    pub week: i8,
    pub weekday: u8,
}

/// A recurrence pattern as stored on a meeting series or an
/// all-following exception.
///
/// When both `until` and `count` are present, `until` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    pub interval: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_weekday: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_month_weekday: Option<MonthlyWeekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_month_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl RecurrencePattern {
    /// Creates an unbounded pattern with an interval of 1 and no selectors.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_weekday: Vec::new(),
            by_month_weekday: None,
            by_month_day: None,
            count: None,
            until: None,
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: u16) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_weekdays(mut self, weekdays: Vec<u8>) -> Self {
        self.by_weekday = weekdays;
        self
    }

    #[must_use]
    pub const fn with_month_day(mut self, day: u8) -> Self {
        self.by_month_day = Some(day);
        self
    }

    #[must_use]
    pub const fn with_month_weekday(mut self, week: i8, weekday: u8) -> Self {
        self.by_month_weekday = Some(MonthlyWeekday { week, weekday });
        self
    }

    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub const fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Interval used for expansion; zero is treated as one.
    #[must_use]
    pub fn effective_interval(&self) -> u16 {
        self.interval.max(1)
    }

    /// ## Summary
    /// Checks the monthly selectors for values RFC 5545 cannot express.
    ///
    /// ## Errors
    ///
    /// Returns `RfcError::InvalidSelector` for a month day outside 1–31, a
    /// week ordinal outside 1–5 and -5–-1, or a weekday outside 1–7.
    pub fn validate(&self) -> RfcResult<()> {
        if let Some(day) = self.by_month_day
            && !(1..=31).contains(&day)
        {
            return Err(RfcError::InvalidSelector(format!(
                "month day {day} is outside 1-31"
            )));
        }

        if let Some(MonthlyWeekday { week, weekday }) = self.by_month_weekday {
            if !matches!(week, 1..=5 | -5..=-1) {
                return Err(RfcError::InvalidSelector(format!(
                    "week ordinal {week} is outside 1-5 and -5..-1"
                )));
            }
            if !(1..=7).contains(&weekday) {
                return Err(RfcError::InvalidSelector(format!(
                    "weekday {weekday} is outside 1-7"
                )));
            }
        }

        Ok(())
    }
}
