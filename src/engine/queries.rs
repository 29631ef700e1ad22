use std::time::Instant;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::model::{Span, TimeSlot};
use crate::observability;

use super::filter::SlotFilter;
use super::slots::{day_window, rule_candidates};
use super::{EngineError, SlotEngine};

impl SlotEngine {
    /// Bookable slots for `date` (a `YYYY-MM-DD` string read in the owner
    /// zone). Captures the clock once so the whole result set shares one
    /// notice cutoff.
    ///
    /// Bad input fails soft: an unparseable date yields an empty list, an
    /// unknown visitor zone falls back to owner-zone labels. Collaborator
    /// failures propagate.
    pub async fn compute_available_slots(
        &self,
        date: &str,
        duration_minutes: u32,
        visitor_timezone: Option<&str>,
    ) -> Result<Vec<TimeSlot>, EngineError> {
        self.compute_available_slots_at(date, duration_minutes, visitor_timezone, Utc::now())
            .await
    }

    /// Explicit-clock variant of [`compute_available_slots`]; `now` is the
    /// single cutoff for the whole result set.
    ///
    /// [`compute_available_slots`]: SlotEngine::compute_available_slots
    pub async fn compute_available_slots_at(
        &self,
        date: &str,
        duration_minutes: u32,
        visitor_timezone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimeSlot>, EngineError> {
        let started = Instant::now();
        metrics::counter!(observability::SLOT_QUERIES_TOTAL).increment(1);

        let spans = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) => self.slots_for_day(d, duration_minutes, now).await?,
            Err(_) => {
                debug!(date, "unparseable date, returning no slots");
                Vec::new()
            }
        };

        // Eligibility is settled; converting to the visitor zone relabels
        // the same instants.
        let display_tz = self.display_zone(visitor_timezone);
        let out: Vec<TimeSlot> = spans
            .into_iter()
            .map(|span| TimeSlot {
                start: span.start.with_timezone(&display_tz).fixed_offset(),
                end: span.end.with_timezone(&display_tz).fixed_offset(),
                available: true,
            })
            .collect();

        metrics::histogram!(observability::SLOT_QUERY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::histogram!(observability::SLOTS_RETURNED).record(out.len() as f64);
        Ok(out)
    }

    /// Dates in `[start_date, end_date]` with at least one bookable slot,
    /// as ISO date strings. Sequential per-day evaluation, one captured
    /// clock for the whole scan; each day still re-reads collaborators
    /// fresh.
    pub async fn get_available_dates(
        &self,
        start_date: &str,
        end_date: &str,
        duration_minutes: u32,
    ) -> Result<Vec<String>, EngineError> {
        self.get_available_dates_at(start_date, end_date, duration_minutes, Utc::now())
            .await
    }

    /// Explicit-clock variant of [`get_available_dates`].
    ///
    /// [`get_available_dates`]: SlotEngine::get_available_dates
    pub async fn get_available_dates_at(
        &self,
        start_date: &str,
        end_date: &str,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, EngineError> {
        let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(start_date, "%Y-%m-%d"),
            NaiveDate::parse_from_str(end_date, "%Y-%m-%d"),
        ) else {
            debug!(start_date, end_date, "unparseable range, returning no dates");
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        let mut current = start;
        let mut days = 0u32;
        while current <= end {
            if !self.slots_for_day(current, duration_minutes, now).await?.is_empty() {
                out.push(current.format("%Y-%m-%d").to_string());
            }
            days += 1;
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        metrics::histogram!(observability::DATE_SCAN_DAYS).record(f64::from(days));
        Ok(out)
    }

    /// Owner-zone core: rules to raw candidates to the notice/booking/
    /// blocked filter. Candidates keep rule order, then time order within
    /// a rule; overlapping rule windows are not merged.
    pub(super) async fn slots_for_day(
        &self,
        date: NaiveDate,
        duration_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Span>, EngineError> {
        if duration_minutes == 0 {
            // Degenerate input: the generation loop could not advance.
            return Ok(Vec::new());
        }

        let day_of_week = date.weekday().num_days_from_sunday() as u8;
        let rules = self.rules.rules_for_day(day_of_week).await?;
        if rules.is_empty() {
            debug!(%date, day_of_week, "no active rules");
            return Ok(Vec::new());
        }

        let settings = self.settings.policy().await?;
        let duration = Duration::minutes(i64::from(duration_minutes));
        let buffer = settings.buffer();

        let mut candidates = Vec::new();
        for rule in &rules {
            rule_candidates(rule, date, self.owner_tz, duration, buffer, &mut candidates);
        }
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // The fetch window is the owner-zone day expanded by the buffer, so
        // a booking adjacent to the day boundary still shadows candidates.
        let Some(day) = day_window(date, self.owner_tz) else {
            return Ok(Vec::new());
        };
        let bookings = self.bookings.bookings_overlapping(day.expand(buffer)).await?;
        let blocked = self.blocked.blocked_for_day(date).await?;

        let filter = SlotFilter::build(date, self.owner_tz, &settings, now, &bookings, &blocked);
        Ok(candidates.into_iter().filter(|c| filter.admits(c)).collect())
    }

    fn display_zone(&self, visitor_timezone: Option<&str>) -> Tz {
        match visitor_timezone {
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    debug!(visitor_timezone = name, "unknown zone, using owner zone");
                    self.owner_tz
                }
            },
            None => self.owner_tz,
        }
    }
}
