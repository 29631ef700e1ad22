//! creneau — appointment-slot availability engine.
//!
//! Turns recurring weekly availability rules, one-off blocked dates,
//! existing bookings, and booking policy (buffer, minimum notice) into the
//! set of bookable time intervals for a calendar date, correct across
//! timezones. Persistence, HTTP, and calendar sync live behind the
//! collaborator traits in [`engine`]; [`engine::InMemoryStore`] is the
//! reference implementation.

pub mod config;
pub mod engine;
pub mod model;
pub mod notify;
pub mod observability;
