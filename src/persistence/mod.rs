//! Persistence layer: PostgreSQL mirror for events and notifications.
//!
//! The in-memory stores remain the fast path; this layer writes each
//! calendar event and notification through to PostgreSQL so that future
//! events survive a restart and feed the reminder re-arm at startup.

pub mod models;
pub mod postgres;

pub use postgres::PostgresPersistence;
