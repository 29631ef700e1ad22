use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::model::Span;

const CHANNEL_CAPACITY: usize = 256;

/// Booking lifecycle notification, keyed by the owner-zone calendar date
/// the booking occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    Created { id: Ulid, span: Span },
    Confirmed { id: Ulid, span: Span },
    Cancelled { id: Ulid, span: Span },
}

impl BookingEvent {
    pub fn span(&self) -> Span {
        match self {
            BookingEvent::Created { span, .. }
            | BookingEvent::Confirmed { span, .. }
            | BookingEvent::Cancelled { span, .. } => *span,
        }
    }
}

/// Broadcast hub for booking events per calendar date. Mail and
/// calendar-sync collaborators subscribe to the dates they track.
pub struct NotifyHub {
    channels: DashMap<NaiveDate, broadcast::Sender<BookingEvent>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to events for a date. Creates the channel if needed.
    pub fn subscribe(&self, date: NaiveDate) -> broadcast::Receiver<BookingEvent> {
        let sender = self
            .channels
            .entry(date)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, date: NaiveDate, event: &BookingEvent) {
        if let Some(sender) = self.channels.get(&date) {
            let _ = sender.send(event.clone());
        }
    }

    /// Remove a date's channel once it is no longer interesting.
    pub fn remove(&self, date: &NaiveDate) {
        self.channels.remove(date);
    }
}
