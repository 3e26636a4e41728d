//! Recurrence patterns and their RFC 5545 rule expansion.

mod compile;
mod pattern;
mod weekday;

pub use compile::{CompiledRule, Expansion, compile_rule, expand, expand_in};
pub use pattern::{Frequency, MonthlyWeekday, RecurrencePattern};
pub use weekday::{parse_weekly_days, weekday_abbrev};
