//! In-memory stores with per-key locking.
//!
//! Each store follows the same shape: a `RwLock`-guarded map, with any
//! check-then-write sequence performed entirely under the write lock. The
//! booking store additionally shards by provider so that conflict checks
//! and commits for one provider are serialized without blocking others.

pub mod availability;
pub mod bookings;
pub mod events;
pub mod notifications;

pub use availability::AvailabilityStore;
pub use bookings::{BookingStore, ProviderBookings};
pub use events::EventStore;
pub use notifications::NotificationStore;
