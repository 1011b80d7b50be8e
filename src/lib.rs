//! # booking-gateway
//!
//! Booking and scheduling engine for a mental-health platform: weekly
//! availability, slot generation, a booking ledger with provider-side
//! confirmation, reminder timers, and live notification push.
//!
//! Identity and clinical content live in collaborating services; this
//! gateway owns who meets whom, and when.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Booking / Confirmation / Slot / Event /
//!     │   Availability / Notification services (service/)
//!     ├── ReminderScheduler (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Sharded in-memory stores (store/)
//!     │
//!     └── PostgreSQL mirror (persistence/, optional)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod store;
pub mod ws;
