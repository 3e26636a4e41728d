//! Expanding a series into concrete occurrences.

use std::collections::HashSet;
use std::ops::ControlFlow;

use cadence_core::clock::{Clock, SystemClock};
use cadence_core::config::OccurrenceConfig;
use cadence_core::constants::DEFAULT_MAX_RESULTS;
use cadence_core::types::OccurrenceStatus;
use cadence_rfc::rfc::recurrence::{RecurrencePattern, expand_in};
use cadence_rfc::rfc::time::{is_past, local_to_utc_lenient, resolve_timezone};
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;

use super::id::{occurrence_id, parse_occurrence_id};
use super::lookup::{find_all_following, find_single};
use super::segment::{PatternSegment, build_segments};
use crate::error::ServiceResult;
use crate::model::{MeetingSeries, Occurrence, OccurrenceException};

/// Filters and result cap for a materialization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceQuery {
    pub include_past: bool,
    pub include_cancelled: bool,
    pub max_results: usize,
}

impl OccurrenceQuery {
    /// Current and future occurrences that are not cancelled.
    #[must_use]
    pub const fn upcoming(max_results: usize) -> Self {
        Self {
            include_past: false,
            include_cancelled: false,
            max_results,
        }
    }

    #[must_use]
    pub const fn with_past(mut self) -> Self {
        self.include_past = true;
        self
    }

    #[must_use]
    pub const fn with_cancelled(mut self) -> Self {
        self.include_cancelled = true;
        self
    }
}

impl Default for OccurrenceQuery {
    fn default() -> Self {
        Self::upcoming(DEFAULT_MAX_RESULTS)
    }
}

/// Computes occurrence lists for meeting series.
///
/// Holds no state between calls; identical input and clock give identical
/// output.
#[derive(Debug, Clone)]
pub struct Materializer<C = SystemClock> {
    config: OccurrenceConfig,
    clock: C,
}

impl Materializer {
    /// Materializer reading the system clock.
    #[must_use]
    pub fn new(config: OccurrenceConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Materializer<C> {
    #[must_use]
    pub fn with_clock(config: OccurrenceConfig, clock: C) -> Self {
        Self { config, clock }
    }

    #[must_use]
    pub const fn config(&self) -> &OccurrenceConfig {
        &self.config
    }

    /// ## Summary
    /// Computes the ordered occurrences of `series`.
    ///
    /// Each pattern segment is expanded up to the next segment's anchor.
    /// Every rule instant is then matched against the recorded exceptions,
    /// filtered by the query, and the walk stops once `max_results`
    /// occurrences are collected. The result is sorted by start time.
    ///
    /// A one-off meeting or a zero cap gives an empty list.
    ///
    /// ## Errors
    ///
    /// Returns an error if the series timezone is unknown, an exception id
    /// is not an epoch-second string, or a recurrence pattern cannot be
    /// compiled.
    #[tracing::instrument(
        skip_all,
        fields(
            meeting_id = %series.id,
            include_past = query.include_past,
            include_cancelled = query.include_cancelled,
            max_results = query.max_results
        )
    )]
    pub fn materialize(
        &self,
        series: &MeetingSeries,
        query: OccurrenceQuery,
    ) -> ServiceResult<Vec<Occurrence>> {
        if !series.is_recurring() || query.max_results == 0 {
            tracing::debug!(recurring = series.is_recurring(), "Nothing to materialize");
            return Ok(Vec::new());
        }

        let tz = resolve_timezone(&series.timezone)?;
        let segments = build_segments(series)?;
        tracing::debug!(segments = segments.len(), %tz, "Built pattern segments");

        let mut walk = Walk {
            series,
            query,
            tz,
            now: self.clock.now(),
            end_buffer: self.config.end_buffer(),
            occurrences: Vec::new(),
            emitted: HashSet::new(),
            previous_id: None,
            previous_old_id: None,
        };

        for (index, segment) in segments.iter().enumerate() {
            let bound = segments.get(index + 1).map(|next| next.anchor);
            let flow =
                walk.segment(index, segment, bound, self.config.max_expanded_per_segment)?;
            if flow.is_break() {
                break;
            }
        }

        let occurrences = walk.finish();
        tracing::debug!(num_occurrences = occurrences.len(), "Materialized occurrences");
        Ok(occurrences)
    }

    /// ## Summary
    /// Upcoming, non-cancelled occurrences capped at `default_max_results`.
    ///
    /// ## Errors
    ///
    /// Same as [`Materializer::materialize`].
    pub fn upcoming(&self, series: &MeetingSeries) -> ServiceResult<Vec<Occurrence>> {
        self.materialize(
            series,
            OccurrenceQuery::upcoming(self.config.default_max_results),
        )
    }
}

/// Values applied to regular occurrences of the segment being walked.
struct ActiveDefaults<'a> {
    duration_minutes: u32,
    topic: &'a str,
    agenda: &'a str,
    time_of_day: Option<NaiveTime>,
}

impl<'a> ActiveDefaults<'a> {
    const fn for_segment(segment: &PatternSegment<'a>) -> Self {
        Self {
            duration_minutes: segment.duration_minutes,
            topic: segment.topic,
            agenda: segment.agenda,
            time_of_day: None,
        }
    }

    /// Switches to an all-following edit. Its new start supplies the
    /// time of day for every later occurrence.
    fn follow(
        &mut self,
        exception: &'a OccurrenceException,
        series: &'a MeetingSeries,
        tz: Tz,
    ) -> ServiceResult<()> {
        let new_start = parse_occurrence_id(exception.effective_new_id())?;
        self.time_of_day = Some(new_start.with_timezone(&tz).time());
        self.duration_minutes = exception
            .duration_override()
            .unwrap_or(series.duration_minutes);
        self.topic = exception.topic_override().unwrap_or(series.topic.as_str());
        self.agenda = exception.agenda_override().unwrap_or(series.agenda.as_str());
        Ok(())
    }

    /// Start of a regular occurrence: the instant's local date at the
    /// active time of day.
    fn start_for(&self, instant: &DateTime<Tz>, tz: Tz) -> ServiceResult<DateTime<Utc>> {
        match self.time_of_day {
            Some(time) => Ok(local_to_utc_lenient(instant.date_naive().and_time(time), tz)?),
            None => Ok(instant.with_timezone(&Utc)),
        }
    }
}

/// State of one materialization call.
struct Walk<'a> {
    series: &'a MeetingSeries,
    query: OccurrenceQuery,
    tz: Tz,
    now: DateTime<Utc>,
    end_buffer: TimeDelta,
    occurrences: Vec<Occurrence>,
    emitted: HashSet<String>,
    previous_id: Option<String>,
    previous_old_id: Option<String>,
}

impl<'a> Walk<'a> {
    fn segment(
        &mut self,
        index: usize,
        segment: &PatternSegment<'a>,
        bound: Option<DateTime<Utc>>,
        max_expanded: usize,
    ) -> ServiceResult<ControlFlow<()>> {
        if let Some(bound) = bound
            && !self.query.include_past
            && bound < self.now
        {
            tracing::trace!(segment = index, %bound, "Skipping segment that ended in the past");
            return Ok(ControlFlow::Continue(()));
        }

        let expansion = expand_in(segment.pattern, segment.anchor, self.tz, bound)?;
        tracing::debug!(
            segment = index,
            anchor = %segment.anchor,
            rrule = %expansion.rule(),
            "Expanding pattern segment"
        );

        let mut active = ActiveDefaults::for_segment(segment);
        for instant in expansion.instants().take(max_expanded) {
            if self.visit(&instant, &mut active)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn visit(
        &mut self,
        instant: &DateTime<Tz>,
        active: &mut ActiveDefaults<'a>,
    ) -> ServiceResult<ControlFlow<()>> {
        let series = self.series;
        let raw_id = occurrence_id(instant);
        if self.previous_id.as_deref() == Some(raw_id.as_str()) {
            tracing::trace!(occurrence_id = %raw_id, "Instant repeats the previous occurrence");
            return Ok(ControlFlow::Continue(()));
        }

        let all_following = find_all_following(&series.exceptions, &raw_id);
        if let Some(exception) = all_following {
            tracing::trace!(
                occurrence_id = %raw_id,
                new_occurrence_id = exception.effective_new_id(),
                "All-following edit takes effect"
            );
            active.follow(exception, series, self.tz)?;
        }

        let adjusted_start = active.start_for(instant, self.tz)?;
        let adjusted_id = occurrence_id(&adjusted_start);

        let mut candidates = vec![raw_id.as_str(), adjusted_id.as_str()];
        if let Some(exception) = all_following {
            candidates.push(exception.effective_new_id());
        }

        if let Some(exception) = find_single(&series.exceptions, &candidates).or(all_following) {
            let recurrence = all_following.and_then(|matched| matched.recurrence.as_ref());
            return self.emit_edited(exception, recurrence, &raw_id, active);
        }

        Ok(self.emit_regular(&raw_id, adjusted_start, active))
    }

    fn emit_edited(
        &mut self,
        exception: &'a OccurrenceException,
        recurrence: Option<&RecurrencePattern>,
        raw_id: &str,
        active: &ActiveDefaults<'a>,
    ) -> ServiceResult<ControlFlow<()>> {
        let start = parse_occurrence_id(exception.effective_new_id())?;
        let duration_minutes = exception
            .duration_override()
            .unwrap_or(active.duration_minutes);

        if !self.query.include_past && is_past(&start, duration_minutes, self.end_buffer, self.now)
        {
            tracing::trace!(occurrence_id = %raw_id, "Skipping past edited occurrence");
            return Ok(ControlFlow::Continue(()));
        }

        let old_id = exception.old_occurrence_id.trim();
        if self.previous_old_id.as_deref() == Some(old_id) {
            tracing::trace!(old_occurrence_id = old_id, "Skipping repeated edit");
            return Ok(ControlFlow::Continue(()));
        }

        let cancelled = [raw_id, old_id, exception.effective_new_id()]
            .into_iter()
            .any(|id| self.series.is_cancelled(id));
        let Some(status) = self.status(cancelled) else {
            tracing::trace!(occurrence_id = %raw_id, "Dropping cancelled edited occurrence");
            return Ok(ControlFlow::Continue(()));
        };

        self.previous_old_id = Some(old_id.to_string());
        Ok(self.push(Occurrence {
            occurrence_id: occurrence_id(&start),
            start_time: start,
            duration_minutes,
            status,
            topic: exception.topic_override().unwrap_or(active.topic).to_string(),
            agenda: exception.agenda_override().unwrap_or(active.agenda).to_string(),
            recurrence: recurrence.cloned(),
        }))
    }

    fn emit_regular(
        &mut self,
        raw_id: &str,
        start: DateTime<Utc>,
        active: &ActiveDefaults<'a>,
    ) -> ControlFlow<()> {
        if !self.query.include_past
            && is_past(&start, active.duration_minutes, self.end_buffer, self.now)
        {
            tracing::trace!(occurrence_id = %raw_id, "Skipping past occurrence");
            return ControlFlow::Continue(());
        }

        let id = occurrence_id(&start);
        let cancelled = self.series.is_cancelled(raw_id) || self.series.is_cancelled(&id);
        let Some(status) = self.status(cancelled) else {
            tracing::trace!(occurrence_id = %raw_id, "Dropping cancelled occurrence");
            return ControlFlow::Continue(());
        };

        self.push(Occurrence {
            occurrence_id: id,
            start_time: start,
            duration_minutes: active.duration_minutes,
            status,
            topic: active.topic.to_string(),
            agenda: active.agenda.to_string(),
            recurrence: None,
        })
    }

    /// Status for an occurrence, or `None` when it is filtered out.
    const fn status(&self, cancelled: bool) -> Option<OccurrenceStatus> {
        match (cancelled, self.query.include_cancelled) {
            (false, _) => Some(OccurrenceStatus::Available),
            (true, true) => Some(OccurrenceStatus::Cancelled),
            (true, false) => None,
        }
    }

    fn push(&mut self, occurrence: Occurrence) -> ControlFlow<()> {
        if !self.emitted.insert(occurrence.occurrence_id.clone()) {
            tracing::trace!(occurrence_id = %occurrence.occurrence_id, "Occurrence already emitted");
            return ControlFlow::Continue(());
        }

        tracing::trace!(
            occurrence_id = %occurrence.occurrence_id,
            start_time = %occurrence.start_time,
            status = %occurrence.status,
            "Adding occurrence"
        );
        self.previous_id = Some(occurrence.occurrence_id.clone());
        self.occurrences.push(occurrence);

        if self.occurrences.len() >= self.query.max_results {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn finish(mut self) -> Vec<Occurrence> {
        self.occurrences.sort_by_key(|occurrence| occurrence.start_time);
        self.occurrences
    }
}
