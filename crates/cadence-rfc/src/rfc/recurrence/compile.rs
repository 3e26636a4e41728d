//! Compiling patterns into RFC 5545 rules and expanding them with `rrule`.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rrule::{RRule, RRuleSet, Unvalidated};

use super::pattern::{Frequency, MonthlyWeekday, RecurrencePattern};
use super::weekday::{weekday_abbrev, weekday_abbrevs};
use crate::error::{RfcError, RfcResult};
use crate::rfc::time::resolve_timezone;

/// A pattern compiled to RRULE text.
///
/// `UNTIL` is kept apart from the text and attached as a UTC instant when
/// the rule is expanded, which `rrule` requires for zoned anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    rule: String,
    until: Option<DateTime<Utc>>,
}

impl CompiledRule {
    /// Rule text without the `UNTIL` part.
    #[must_use]
    pub fn rule_text(&self) -> &str {
        &self.rule
    }

    #[must_use]
    pub const fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    fn to_rrule(&self) -> RfcResult<RRule<Unvalidated>> {
        let rrule = self
            .rule
            .parse::<RRule<Unvalidated>>()
            .map_err(|e| RfcError::ParseError(format!("{}: {e}", self.rule)))?;

        Ok(match self.until {
            Some(until) => rrule.until(until.with_timezone(&rrule::Tz::UTC)),
            None => rrule,
        })
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rule)?;
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format("%Y%m%dT%H%M%SZ"))?;
        }
        Ok(())
    }
}

/// ## Summary
/// Compiles a pattern into an RFC 5545 rule.
///
/// An `explicit_end` replaces the pattern's own end date and suppresses
/// `COUNT`. Without it, the pattern's `until` still takes precedence over
/// its `count`.
///
/// Days 29–31 of a monthly pattern fall back to the last day of shorter
/// months through `BYSETPOS=-1`.
///
/// ## Errors
///
/// Returns `RfcError::InvalidSelector` if a monthly selector is out of range.
pub fn compile_rule(
    pattern: &RecurrencePattern,
    explicit_end: Option<DateTime<Utc>>,
) -> RfcResult<CompiledRule> {
    pattern.validate()?;

    let mut parts = vec![
        format!("FREQ={}", pattern.frequency.as_rrule_str()),
        "WKST=SU".to_string(),
        format!("INTERVAL={}", pattern.effective_interval()),
    ];

    match pattern.frequency {
        Frequency::Daily => {}
        Frequency::Weekly => {
            let days = weekday_abbrevs(&pattern.by_weekday);
            if !days.is_empty() {
                parts.push(format!("BYDAY={}", days.join(",")));
            }
        }
        Frequency::Monthly => match (pattern.by_month_weekday, pattern.by_month_day) {
            (Some(selector), month_day) => {
                if month_day.is_some() {
                    tracing::warn!(
                        ?selector,
                        ?month_day,
                        "Both monthly selectors set, ignoring month day"
                    );
                }
                parts.push(month_weekday_part(selector)?);
            }
            (None, Some(day)) => parts.push(month_day_part(day)),
            (None, None) => {}
        },
    }

    let until = explicit_end.or(pattern.until);
    if until.is_none()
        && let Some(count) = pattern.count.filter(|&count| count > 0)
    {
        parts.push(format!("COUNT={count}"));
    }

    let compiled = CompiledRule {
        rule: parts.join(";"),
        until,
    };
    tracing::trace!(rule = %compiled, "Compiled recurrence rule");
    Ok(compiled)
}

fn month_weekday_part(selector: MonthlyWeekday) -> RfcResult<String> {
    let day = weekday_abbrev(selector.weekday).ok_or_else(|| {
        RfcError::InvalidSelector(format!("weekday {} is outside 1-7", selector.weekday))
    })?;
    Ok(format!("BYDAY={}{day}", selector.week))
}

fn month_day_part(day: u8) -> String {
    match day {
        29 => "BYMONTHDAY=28,29;BYSETPOS=-1".to_string(),
        30 => "BYMONTHDAY=28,29,30;BYSETPOS=-1".to_string(),
        31 => "BYMONTHDAY=28,29,30,31;BYSETPOS=-1".to_string(),
        day => format!("BYMONTHDAY={day}"),
    }
}

/// A compiled rule bound to an anchor and a timezone.
///
/// A rule that ends before its anchor has no rule set and yields nothing.
#[derive(Debug, Clone)]
pub struct Expansion {
    rule: CompiledRule,
    timezone: Tz,
    set: Option<RRuleSet>,
}

impl Expansion {
    #[must_use]
    pub const fn rule(&self) -> &CompiledRule {
        &self.rule
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Lazily yields instants in ascending order, anchor first when it
    /// matches the rule.
    pub fn instants(&self) -> impl Iterator<Item = DateTime<Tz>> + '_ {
        let tz = self.timezone;
        self.set
            .iter()
            .flatten()
            .map(move |instant| instant.with_timezone(&tz))
    }
}

/// ## Summary
/// Compiles `pattern` and binds it to `anchor` in the named timezone.
///
/// Wall-clock time is preserved across DST transitions.
///
/// ## Errors
///
/// Returns an error if the timezone is unknown, a selector is invalid, or
/// the `rrule` crate rejects the rule.
pub fn expand(
    pattern: &RecurrencePattern,
    anchor: DateTime<Utc>,
    timezone: &str,
    explicit_end: Option<DateTime<Utc>>,
) -> RfcResult<Expansion> {
    let tz = resolve_timezone(timezone)?;
    expand_in(pattern, anchor, tz, explicit_end)
}

/// ## Summary
/// Same as [`expand`] with an already resolved timezone.
///
/// An end before `anchor` gives an empty expansion.
///
/// ## Errors
///
/// Returns an error if a selector is invalid or the `rrule` crate rejects
/// the rule.
#[tracing::instrument(skip(pattern), fields(frequency = ?pattern.frequency))]
pub fn expand_in(
    pattern: &RecurrencePattern,
    anchor: DateTime<Utc>,
    tz: Tz,
    explicit_end: Option<DateTime<Utc>>,
) -> RfcResult<Expansion> {
    let rule = compile_rule(pattern, explicit_end)?;
    if let Some(until) = rule.until()
        && until < anchor
    {
        tracing::debug!(%until, %anchor, "Rule ends before its anchor");
        return Ok(Expansion {
            rule,
            timezone: tz,
            set: None,
        });
    }

    let dt_start = anchor.with_timezone(&rrule::Tz::Tz(tz));
    let set = rule.to_rrule()?.build(dt_start)?;

    Ok(Expansion {
        rule,
        timezone: tz,
        set: Some(set),
    })
}
