mod error;
mod filter;
mod mutations;
mod queries;
mod slots;
mod store;

pub use error::EngineError;
pub use mutations::BookingRequest;
pub use store::InMemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use ulid::Ulid;

use crate::config::BookingConfig;
use crate::model::{AvailabilityRule, BlockedDate, Booking, BookingStatus, PolicySettings, Span};
use crate::notify::NotifyHub;

// ── Collaborator Interfaces ───────────────────────────────────────

/// Recurring weekly opening windows. Read-only to the engine.
#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Active rules for `day_of_week` (0 = Sunday), ordered by start time.
    async fn rules_for_day(&self, day_of_week: u8) -> Result<Vec<AvailabilityRule>, EngineError>;
}

/// Reservations. The engine reads active bookings to filter slots; the
/// booking workflow writes through the same interface.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Active (PENDING/CONFIRMED) bookings whose span overlaps `window`.
    async fn bookings_overlapping(&self, window: Span) -> Result<Vec<Booking>, EngineError>;

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError>;

    /// Insert a new booking. Must fail with [`EngineError::Conflict`] when
    /// the span overlaps an existing active booking — the atomic
    /// commit-time check that backs re-validation. Two racing inserts may
    /// both pass re-validation; only one survives this call.
    async fn insert(&self, booking: Booking) -> Result<(), EngineError>;

    /// Transition a booking's status. `meeting_url` overwrites only when
    /// `Some`.
    async fn set_status(
        &self,
        id: Ulid,
        status: BookingStatus,
        meeting_url: Option<String>,
    ) -> Result<Booking, EngineError>;
}

/// One-off exclusions. Read-only to the engine.
#[async_trait]
pub trait BlockedDateRepository: Send + Sync {
    async fn blocked_for_day(&self, date: NaiveDate) -> Result<Vec<BlockedDate>, EngineError>;
}

/// Booking-wide policy. Implementations substitute defaults for an unset
/// row; the engine never sees an absent configuration.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn policy(&self) -> Result<PolicySettings, EngineError>;
}

// ── Engine ────────────────────────────────────────────────────────

/// Stateless slot computation over injected collaborators.
///
/// Every invocation re-reads rules, policy, bookings, and blocks fresh;
/// nothing is cached between calls, so concurrent queries are independent.
/// The engine answers "what is available as of this read" — a result is
/// never a reservation, and booking creation re-validates at commit time.
pub struct SlotEngine {
    rules: Arc<dyn RuleRepository>,
    bookings: Arc<dyn BookingRepository>,
    blocked: Arc<dyn BlockedDateRepository>,
    settings: Arc<dyn SettingsProvider>,
    notify: Arc<NotifyHub>,
    owner_tz: Tz,
}

impl SlotEngine {
    pub fn new(
        config: &BookingConfig,
        rules: Arc<dyn RuleRepository>,
        bookings: Arc<dyn BookingRepository>,
        blocked: Arc<dyn BlockedDateRepository>,
        settings: Arc<dyn SettingsProvider>,
        notify: Arc<NotifyHub>,
    ) -> Self {
        Self {
            rules,
            bookings,
            blocked,
            settings,
            notify,
            owner_tz: config.owner_timezone,
        }
    }

    /// Wire every collaborator to one in-memory store.
    pub fn with_store(
        config: &BookingConfig,
        store: Arc<InMemoryStore>,
        notify: Arc<NotifyHub>,
    ) -> Self {
        Self::new(
            config,
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            notify,
        )
    }

    pub fn owner_timezone(&self) -> Tz {
        self.owner_tz
    }
}
