use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::model::{AvailabilityRule, Span};

// ── Slot Generation ───────────────────────────────────────────────

/// Resolve `date` + wall-clock `time` in `tz` to a UTC instant.
///
/// Returns `None` when the wall clock does not exist in `tz` (spring-forward
/// gap); on fall-back ambiguity the earlier occurrence wins.
pub(super) fn anchor(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The owner-zone calendar day as a UTC window `[00:00, next 00:00)`.
pub(super) fn day_window(date: NaiveDate, tz: Tz) -> Option<Span> {
    let start = anchor(date, NaiveTime::MIN, tz)?;
    let end = anchor(date.succ_opt()?, NaiveTime::MIN, tz)?;
    Some(Span::new(start, end))
}

fn on_the_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Generate raw candidates for one rule window on `date`, anchored in the
/// owner zone. Successive candidates step by `duration + buffer`, so slots
/// from the same window never overlap and are separated by at least the
/// buffer. Candidates from different windows are generated independently
/// and are NOT merged or deduplicated here.
///
/// Inverted or empty windows, and windows whose start falls into a DST gap,
/// contribute nothing.
pub(super) fn rule_candidates(
    rule: &AvailabilityRule,
    date: NaiveDate,
    owner_tz: Tz,
    duration: Duration,
    buffer: Duration,
    out: &mut Vec<Span>,
) {
    let Some(mut slot_start) = anchor(date, on_the_minute(rule.start), owner_tz) else {
        return;
    };
    let Some(rule_end) = anchor(date, on_the_minute(rule.end), owner_tz) else {
        return;
    };

    while slot_start + duration <= rule_end {
        out.push(Span::new(slot_start, slot_start + duration));
        slot_start = slot_start + duration + buffer;
    }
}
