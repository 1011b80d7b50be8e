//! Application services wiring the stores, the push bus, the reminder
//! timers and the optional persistence mirror together.

pub mod availability;
pub mod booking;
pub mod confirmation;
pub mod events;
pub mod notifications;
pub mod reminders;
pub mod slots;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use confirmation::ConfirmationService;
pub use events::{EventPatch, EventService, NewEvent};
pub use notifications::{NewNotification, NotificationService};
pub use reminders::ReminderScheduler;
pub use slots::SlotService;
