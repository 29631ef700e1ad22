use chrono::{DateTime, Utc};
use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    /// Re-validation at booking time found the requested start gone.
    SlotUnavailable(DateTime<Utc>),
    /// Persistence-level double booking: the requested span overlaps an
    /// existing active booking.
    Conflict(Ulid),
    CompletedBooking(Ulid),
    InvalidInput(&'static str),
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::SlotUnavailable(start) => {
                write!(f, "slot starting at {} is no longer available", start.to_rfc3339())
            }
            EngineError::Conflict(id) => write!(f, "conflict with booking: {id}"),
            EngineError::CompletedBooking(id) => {
                write!(f, "cannot cancel completed booking: {id}")
            }
            EngineError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
