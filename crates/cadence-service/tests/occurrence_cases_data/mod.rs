use cadence_core::clock::FixedClock;
use cadence_core::config::OccurrenceConfig;
use cadence_rfc::rfc::recurrence::RecurrencePattern;
use chrono::{DateTime, Utc};

// Occurrence ids used below, all in UTC
const JAN_03_1000: &str = "1704276000";
const JAN_08_1000: &str = "1704708000";
const JAN_08_1100: &str = "1704711600";
const JAN_08_1400: &str = "1704722400";
const JAN_10_1000: &str = "1704880800";
const JAN_10_1100: &str = "1704884400";

// The same wall-clock hours in America/New_York (UTC-5 in January)
const NY_JAN_10_1000: &str = "1704898800";
const NY_JAN_10_1100: &str = "1704902400";

const BEFORE_SERIES: &str = "2023-12-01T00:00:00Z";

pub struct ExpectedOccurrence {
    pub start: &'static str,
    pub duration: u32,
    pub status: &'static str,
    pub topic: &'static str,
}

pub struct OccurrenceCase {
    pub name: &'static str,
    pub series: fn() -> MeetingSeries,
    pub now: &'static str,
    pub query: OccurrenceQuery,
    pub expected: Vec<ExpectedOccurrence>,
    /// Starts of the occurrences expected to carry a recurrence pattern.
    pub opens_segment: &'static [&'static str],
}

fn available(start: &'static str, duration: u32, topic: &'static str) -> ExpectedOccurrence {
    ExpectedOccurrence {
        start,
        duration,
        status: "available",
        topic,
    }
}

fn cancelled(start: &'static str, duration: u32, topic: &'static str) -> ExpectedOccurrence {
    ExpectedOccurrence {
        start,
        duration,
        status: "cancel",
        topic,
    }
}

fn parse_rfc3339(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Invalid RFC3339 timestamp {value}: {err}"))
        .with_timezone(&Utc)
}

/// Monday and Wednesday at 10:00 UTC from Monday 2024-01-01, one hour long.
fn weekly_series() -> MeetingSeries {
    MeetingSeries::new("weekly-sync", parse_rfc3339("2024-01-01T10:00:00Z"), 60)
        .with_topic("Weekly sync")
        .with_agenda("Status round")
        .with_recurrence(RecurrencePattern::weekly().with_weekdays(vec![2, 4]))
}

fn switch_to_daily() -> MeetingSeries {
    weekly_series().with_exception(
        OccurrenceException::all_following(JAN_08_1000, JAN_08_1000)
            .with_recurrence(RecurrencePattern::daily()),
    )
}

fn move_to_eleven() -> MeetingSeries {
    weekly_series()
        .with_exception(OccurrenceException::all_following(JAN_08_1000, JAN_08_1100).with_duration(30))
}

/// Switches to daily on Jan 8, then to Wednesday and Friday on Jan 10.
fn switch_twice() -> MeetingSeries {
    switch_to_daily().with_exception(
        OccurrenceException::all_following(JAN_10_1000, JAN_10_1000)
            .with_topic("Late sync")
            .with_recurrence(RecurrencePattern::weekly().with_weekdays(vec![4, 6])),
    )
}

/// Monday and Wednesday at 10:00 New York time from Monday 2024-01-08.
fn new_york_series() -> MeetingSeries {
    MeetingSeries::new("ny-standup", parse_rfc3339("2024-01-08T15:00:00Z"), 60)
        .with_timezone("America/New_York")
        .with_topic("NY standup")
        .with_recurrence(RecurrencePattern::weekly().with_weekdays(vec![2, 4]))
}

#[expect(clippy::too_many_lines)]
pub fn occurrence_cases() -> Vec<OccurrenceCase> {
    vec![
        OccurrenceCase {
            name: "weekly_basic",
            series: weekly_series,
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "result_cap",
            series: weekly_series,
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(2),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "single_edit_topic",
            series: || {
                weekly_series()
                    .with_exception(OccurrenceException::single(JAN_08_1000, "").with_topic("Special"))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Special"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "single_edit_move",
            series: || {
                weekly_series()
                    .with_exception(OccurrenceException::single(JAN_08_1000, JAN_08_1400).with_duration(90))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T14:00:00Z", 90, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "all_following_switch_to_daily",
            series: switch_to_daily,
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(6),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-09T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-11T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &["2024-01-08T10:00:00Z"],
        },
        OccurrenceCase {
            name: "all_following_time_change",
            series: move_to_eleven,
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(5),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T11:00:00Z", 30, "Weekly sync"),
                available("2024-01-10T11:00:00Z", 30, "Weekly sync"),
                available("2024-01-15T11:00:00Z", 30, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "chained_edit_after_time_change",
            series: || {
                move_to_eleven()
                    .with_exception(OccurrenceException::single(JAN_10_1100, "").with_topic("Chained"))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(5),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T11:00:00Z", 30, "Weekly sync"),
                available("2024-01-10T11:00:00Z", 30, "Chained"),
                available("2024-01-15T11:00:00Z", 30, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "cancelled_excluded",
            series: || weekly_series().with_cancelled(JAN_03_1000),
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-15T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "cancelled_included",
            series: || weekly_series().with_cancelled(JAN_03_1000),
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4).with_cancelled(),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                cancelled("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "cancelled_by_new_id",
            series: || {
                weekly_series()
                    .with_exception(OccurrenceException::single(JAN_08_1000, JAN_08_1400))
                    .with_cancelled(JAN_08_1400)
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4).with_cancelled(),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                cancelled("2024-01-08T14:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "past_filtered",
            series: weekly_series,
            now: "2024-01-09T00:00:00Z",
            query: OccurrenceQuery::upcoming(3),
            expected: vec![
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-15T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-17T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "past_included",
            series: weekly_series,
            now: "2024-01-09T00:00:00Z",
            query: OccurrenceQuery::upcoming(2).with_past(),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "running_late_still_upcoming",
            series: weekly_series,
            now: "2024-01-08T11:30:00Z",
            query: OccurrenceQuery::upcoming(2),
            expected: vec![
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "past_segment_skipped",
            series: switch_to_daily,
            now: "2024-01-09T00:00:00Z",
            query: OccurrenceQuery::upcoming(3),
            expected: vec![
                available("2024-01-09T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-11T10:00:00Z", 60, "Weekly sync"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "month_end_fallback",
            series: || {
                MeetingSeries::new("month-end", parse_rfc3339("2024-01-31T10:00:00Z"), 30)
                    .with_topic("Close the books")
                    .with_recurrence(RecurrencePattern::monthly().with_month_day(31))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-31T10:00:00Z", 30, "Close the books"),
                available("2024-02-29T10:00:00Z", 30, "Close the books"),
                available("2024-03-31T10:00:00Z", 30, "Close the books"),
                available("2024-04-30T10:00:00Z", 30, "Close the books"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "second_tuesday_across_dst",
            series: || {
                MeetingSeries::new("board", parse_rfc3339("2024-01-09T15:00:00Z"), 45)
                    .with_timezone("America/New_York")
                    .with_topic("Board")
                    .with_recurrence(RecurrencePattern::monthly().with_month_weekday(2, 3))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-09T15:00:00Z", 45, "Board"),
                available("2024-02-13T15:00:00Z", 45, "Board"),
                available("2024-03-12T14:00:00Z", 45, "Board"),
                available("2024-04-09T14:00:00Z", 45, "Board"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "count_bounded",
            series: || {
                MeetingSeries::new("kickoff", parse_rfc3339("2024-01-01T09:00:00Z"), 15)
                    .with_recurrence(RecurrencePattern::daily().with_interval(2).with_count(3))
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(10),
            expected: vec![
                available("2024-01-01T09:00:00Z", 15, ""),
                available("2024-01-03T09:00:00Z", 15, ""),
                available("2024-01-05T09:00:00Z", 15, ""),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "all_following_superseded",
            series: switch_twice,
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(7),
            expected: vec![
                available("2024-01-01T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-03T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-08T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-09T10:00:00Z", 60, "Weekly sync"),
                available("2024-01-10T10:00:00Z", 60, "Late sync"),
                available("2024-01-12T10:00:00Z", 60, "Late sync"),
                available("2024-01-17T10:00:00Z", 60, "Late sync"),
            ],
            opens_segment: &["2024-01-08T10:00:00Z", "2024-01-10T10:00:00Z"],
        },
        OccurrenceCase {
            name: "named_timezone_until",
            series: || {
                let mut series = new_york_series();
                series.recurrence = series
                    .recurrence
                    .map(|pattern| pattern.with_until(parse_rfc3339("2024-01-18T00:00:00Z")));
                series
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(10),
            expected: vec![
                available("2024-01-08T15:00:00Z", 60, "NY standup"),
                available("2024-01-10T15:00:00Z", 60, "NY standup"),
                available("2024-01-15T15:00:00Z", 60, "NY standup"),
                available("2024-01-17T15:00:00Z", 60, "NY standup"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "named_timezone_switch_to_daily",
            series: || {
                new_york_series().with_exception(
                    OccurrenceException::all_following(NY_JAN_10_1000, NY_JAN_10_1000)
                        .with_recurrence(RecurrencePattern::daily()),
                )
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(5),
            expected: vec![
                available("2024-01-08T15:00:00Z", 60, "NY standup"),
                available("2024-01-10T15:00:00Z", 60, "NY standup"),
                available("2024-01-11T15:00:00Z", 60, "NY standup"),
                available("2024-01-12T15:00:00Z", 60, "NY standup"),
                available("2024-01-13T15:00:00Z", 60, "NY standup"),
            ],
            opens_segment: &["2024-01-10T15:00:00Z"],
        },
        OccurrenceCase {
            name: "named_timezone_time_change",
            series: || {
                new_york_series().with_exception(
                    OccurrenceException::all_following(NY_JAN_10_1000, NY_JAN_10_1100)
                        .with_duration(30)
                        .with_topic("NY standup (late)"),
                )
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(4),
            expected: vec![
                available("2024-01-08T15:00:00Z", 60, "NY standup"),
                available("2024-01-10T16:00:00Z", 30, "NY standup (late)"),
                available("2024-01-15T16:00:00Z", 30, "NY standup (late)"),
                available("2024-01-17T16:00:00Z", 30, "NY standup (late)"),
            ],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "ended_before_start",
            series: || {
                MeetingSeries::new("never", parse_rfc3339("2024-01-01T10:00:00Z"), 30)
                    .with_recurrence(
                        RecurrencePattern::daily().with_until(parse_rfc3339("2024-01-01T00:00:00Z")),
                    )
            },
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(10).with_past(),
            expected: vec![],
            opens_segment: &[],
        },
        OccurrenceCase {
            name: "non_recurring",
            series: || MeetingSeries::new("one-off", parse_rfc3339("2024-01-01T10:00:00Z"), 60),
            now: BEFORE_SERIES,
            query: OccurrenceQuery::upcoming(10).with_past().with_cancelled(),
            expected: vec![],
            opens_segment: &[],
        },
    ]
}

pub fn run_case(case: &OccurrenceCase) -> Vec<Occurrence> {
    let clock = FixedClock::new(parse_rfc3339(case.now));
    Materializer::with_clock(OccurrenceConfig::default(), clock)
        .materialize(&(case.series)(), case.query)
        .unwrap_or_else(|err| panic!("Case {} failed: {err}", case.name))
}

pub fn assert_case(case: &OccurrenceCase) {
    let occurrences = run_case(case);

    let actual: Vec<(i64, u32, &str, &str)> = occurrences
        .iter()
        .map(|occurrence| {
            (
                occurrence.start_time.timestamp(),
                occurrence.duration_minutes,
                occurrence.status.as_str(),
                occurrence.topic.as_str(),
            )
        })
        .collect();
    let expected: Vec<(i64, u32, &str, &str)> = case
        .expected
        .iter()
        .map(|expected| {
            (
                parse_rfc3339(expected.start).timestamp(),
                expected.duration,
                expected.status,
                expected.topic,
            )
        })
        .collect();
    assert_eq!(actual, expected, "Case {} did not match", case.name);

    for occurrence in &occurrences {
        assert_eq!(
            occurrence.occurrence_id,
            occurrence.start_time.timestamp().to_string(),
            "Case {} has an id that is not the start second",
            case.name
        );
    }

    let opening: Vec<DateTime<Utc>> = occurrences
        .iter()
        .filter(|occurrence| occurrence.recurrence.is_some())
        .map(|occurrence| occurrence.start_time)
        .collect();
    let expected_opening: Vec<DateTime<Utc>> = case
        .opens_segment
        .iter()
        .map(|start| parse_rfc3339(start))
        .collect();
    assert_eq!(
        opening, expected_opening,
        "Case {} carried recurrence on the wrong occurrences",
        case.name
    );
}
