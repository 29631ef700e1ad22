use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use ulid::Ulid;

use crate::model::{AvailabilityRule, BlockedDate, Booking, BookingStatus, PolicySettings, Span};

use super::{
    BlockedDateRepository, BookingRepository, EngineError, RuleRepository, SettingsProvider,
};

/// Reference collaborator: every repository trait over one process-local
/// store. Stands in for the persistence layer in tests and embedded use;
/// a database-backed implementation replaces it behind the same traits.
pub struct InMemoryStore {
    rules: DashMap<Ulid, AvailabilityRule>,
    blocked: DashMap<Ulid, BlockedDate>,
    bookings: DashMap<Ulid, Booking>,
    /// Serializes booking inserts so the overlap check and the write are
    /// one atomic step — the unique-constraint stand-in.
    booking_write: Mutex<()>,
    settings: RwLock<Option<PolicySettings>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
            blocked: DashMap::new(),
            bookings: DashMap::new(),
            booking_write: Mutex::new(()),
            settings: RwLock::new(None),
        }
    }

    // ── Admin surface ────────────────────────────────────────

    pub fn add_rule(&self, rule: AvailabilityRule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn remove_rule(&self, id: &Ulid) -> Option<AvailabilityRule> {
        self.rules.remove(id).map(|(_, r)| r)
    }

    pub fn set_rule_active(&self, id: &Ulid, active: bool) -> bool {
        match self.rules.get_mut(id) {
            Some(mut rule) => {
                rule.active = active;
                true
            }
            None => false,
        }
    }

    pub fn add_blocked_date(&self, blocked: BlockedDate) {
        self.blocked.insert(blocked.id, blocked);
    }

    pub fn remove_blocked_date(&self, id: &Ulid) -> Option<BlockedDate> {
        self.blocked.remove(id).map(|(_, b)| b)
    }

    pub async fn set_policy(&self, settings: PolicySettings) {
        *self.settings.write().await = Some(settings);
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }
}

#[async_trait]
impl RuleRepository for InMemoryStore {
    async fn rules_for_day(&self, day_of_week: u8) -> Result<Vec<AvailabilityRule>, EngineError> {
        let mut rules: Vec<AvailabilityRule> = self
            .rules
            .iter()
            .filter(|e| e.active && e.day_of_week == day_of_week)
            .map(|e| e.value().clone())
            .collect();
        rules.sort_by_key(|r| r.start);
        Ok(rules)
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn bookings_overlapping(&self, window: Span) -> Result<Vec<Booking>, EngineError> {
        let mut hits: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|e| e.status.is_active() && e.span.overlaps(&window))
            .map(|e| e.value().clone())
            .collect();
        hits.sort_by_key(|b| b.span.start);
        Ok(hits)
    }

    async fn get(&self, id: Ulid) -> Result<Option<Booking>, EngineError> {
        Ok(self.bookings.get(&id).map(|e| e.value().clone()))
    }

    async fn insert(&self, booking: Booking) -> Result<(), EngineError> {
        let _guard = self.booking_write.lock().await;
        if self.bookings.contains_key(&booking.id) {
            return Err(EngineError::Conflict(booking.id));
        }
        for existing in self.bookings.iter() {
            if existing.status.is_active() && existing.span.overlaps(&booking.span) {
                return Err(EngineError::Conflict(existing.id));
            }
        }
        self.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn set_status(
        &self,
        id: Ulid,
        status: BookingStatus,
        meeting_url: Option<String>,
    ) -> Result<Booking, EngineError> {
        let mut entry = self.bookings.get_mut(&id).ok_or(EngineError::NotFound(id))?;
        entry.status = status;
        if meeting_url.is_some() {
            entry.meeting_url = meeting_url;
        }
        Ok(entry.clone())
    }
}

#[async_trait]
impl BlockedDateRepository for InMemoryStore {
    async fn blocked_for_day(&self, date: NaiveDate) -> Result<Vec<BlockedDate>, EngineError> {
        Ok(self
            .blocked
            .iter()
            .filter(|e| e.date == date)
            .map(|e| e.value().clone())
            .collect())
    }
}

#[async_trait]
impl SettingsProvider for InMemoryStore {
    async fn policy(&self) -> Result<PolicySettings, EngineError> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }
}
