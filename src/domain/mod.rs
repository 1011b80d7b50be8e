//! Core domain types: identifiers, records, intervals, and the push bus.

pub mod availability;
pub mod booking;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod interval;
pub mod notification;
pub mod push_event;

pub use availability::WeeklyAvailability;
pub use booking::{Booking, BookingStatus};
pub use event::{CalendarEvent, EventKind};
pub use event_bus::EventBus;
pub use ids::{AvailabilityId, BookingId, EventId, NotificationId, UserId};
pub use interval::Slot;
pub use notification::{Notification, NotificationKind, ResponseStatus};
pub use push_event::PushEvent;
