use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;
use ulid::Ulid;

use crate::model::{Booking, BookingStatus, Span};
use crate::notify::BookingEvent;
use crate::observability;

use super::{EngineError, SlotEngine};

/// Durations the public booking form may submit, in minutes.
const MIN_BOOKING_MINUTES: u32 = 15;
const MAX_BOOKING_MINUTES: u32 = 120;

/// What the public booking flow submits. `start_time` is RFC 3339, or a
/// naive `YYYY-MM-DDTHH:MM[:SS]` interpreted in the request zone.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub visitor_name: String,
    pub visitor_email: String,
    pub start_time: String,
    pub duration_minutes: u32,
    pub timezone: Option<String>,
    pub notes: Option<String>,
}

impl SlotEngine {
    /// Create a PENDING booking.
    ///
    /// Re-runs the slot computation for the requested date and requires the
    /// exact start instant among the results — re-validation at write time,
    /// not locking. The store's insert is the final atomic check, so of two
    /// racers that both pass re-validation only one commits.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, EngineError> {
        self.create_booking_at(request, Utc::now()).await
    }

    /// Explicit-clock variant of [`create_booking`].
    ///
    /// [`create_booking`]: SlotEngine::create_booking
    pub async fn create_booking_at(
        &self,
        request: &BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<Booking, EngineError> {
        if !(MIN_BOOKING_MINUTES..=MAX_BOOKING_MINUTES).contains(&request.duration_minutes) {
            return Err(EngineError::InvalidInput(
                "duration must be between 15 and 120 minutes",
            ));
        }
        let tz = request
            .timezone
            .as_deref()
            .and_then(|s| s.parse::<Tz>().ok())
            .unwrap_or(self.owner_tz);
        let start = parse_start_time(&request.start_time, tz)
            .ok_or(EngineError::InvalidInput("invalid start time"))?;

        let date = start.with_timezone(&tz).date_naive().format("%Y-%m-%d").to_string();
        let slots = self
            .compute_available_slots_at(&date, request.duration_minutes, Some(tz.name()), now)
            .await?;
        if !slots.iter().any(|slot| slot.start == start) {
            metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            return Err(EngineError::SlotUnavailable(start));
        }

        let booking = Booking {
            id: Ulid::new(),
            visitor_name: request.visitor_name.clone(),
            visitor_email: request.visitor_email.clone(),
            span: Span::new(start, start + Duration::minutes(i64::from(request.duration_minutes))),
            duration_minutes: request.duration_minutes,
            timezone: tz,
            notes: request.notes.clone(),
            meeting_url: None,
            status: BookingStatus::Pending,
            created_at: now,
        };

        if let Err(e) = self.bookings.insert(booking.clone()).await {
            if matches!(e, EngineError::Conflict(_)) {
                metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
            }
            return Err(e);
        }

        metrics::counter!(observability::BOOKINGS_CREATED_TOTAL).increment(1);
        info!(booking = %booking.id, start = %start, "booking created");
        self.emit(BookingEvent::Created {
            id: booking.id,
            span: booking.span,
        });
        Ok(booking)
    }

    /// PENDING → CONFIRMED, optionally attaching a meeting URL.
    pub async fn confirm_booking(
        &self,
        id: Ulid,
        meeting_url: Option<String>,
    ) -> Result<Booking, EngineError> {
        let booking = self
            .bookings
            .set_status(id, BookingStatus::Confirmed, meeting_url)
            .await?;
        info!(booking = %id, "booking confirmed");
        self.emit(BookingEvent::Confirmed {
            id,
            span: booking.span,
        });
        Ok(booking)
    }

    /// Any non-COMPLETED status → CANCELLED. The freed time shows up in the
    /// next slot computation.
    pub async fn cancel_booking(&self, id: Ulid) -> Result<Booking, EngineError> {
        let existing = self
            .bookings
            .get(id)
            .await?
            .ok_or(EngineError::NotFound(id))?;
        if existing.status == BookingStatus::Completed {
            return Err(EngineError::CompletedBooking(id));
        }

        let booking = self
            .bookings
            .set_status(id, BookingStatus::Cancelled, None)
            .await?;
        info!(booking = %id, "booking cancelled");
        self.emit(BookingEvent::Cancelled {
            id,
            span: booking.span,
        });
        Ok(booking)
    }

    fn emit(&self, event: BookingEvent) {
        let date = event.span().start.with_timezone(&self.owner_tz).date_naive();
        self.notify.send(date, &event);
    }
}

fn parse_start_time(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
