use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` over UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Widen the interval by `pad` on both ends.
    pub fn expand(&self, pad: Duration) -> Span {
        Span {
            start: self.start - pad,
            end: self.end + pad,
        }
    }
}

/// A recurring weekly opening window, authored in the owner's zone.
///
/// `start >= end` is tolerated (the window simply yields no slots); storage
/// does not guarantee well-ordered times. The stored `timezone` records the
/// zone the window was authored in; slot anchoring always happens in the
/// owner zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: Ulid,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
    pub active: bool,
}

/// A one-off exclusion. With both times present only that sub-range is
/// blocked; with either absent the entire day is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedDate {
    pub id: Ulid,
    pub date: NaiveDate,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl BlockedDate {
    pub fn blocks_whole_day(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Only PENDING and CONFIRMED bookings occupy time for availability.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// A committed or pending reservation. `span` holds absolute UTC instants;
/// `timezone` is the zone the visitor booked in, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub visitor_name: String,
    pub visitor_email: String,
    pub span: Span,
    pub duration_minutes: u32,
    pub timezone: Tz,
    pub notes: Option<String>,
    pub meeting_url: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking-wide policy, singleton. Missing stored fields fall back to
/// these defaults; the engine never errors on an absent settings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySettings {
    pub min_notice_hours: i64,
    pub buffer_minutes: i64,
    pub max_advance_days: u32,
    pub allowed_durations: Vec<u32>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            min_notice_hours: 24,
            buffer_minutes: 15,
            max_advance_days: 60,
            allowed_durations: vec![15, 30, 60],
        }
    }
}

impl PolicySettings {
    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.buffer_minutes)
    }

    pub fn min_notice(&self) -> Duration {
        Duration::hours(self.min_notice_hours)
    }
}

/// Engine output: one bookable interval, labeled in the display zone.
/// Only `available: true` slots are ever emitted; rejected candidates are
/// dropped, not flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub available: bool,
}
