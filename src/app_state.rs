//! Shared application state for handlers and WebSocket connections.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::domain::EventBus;
use crate::persistence::PostgresPersistence;
use crate::service::{
    AvailabilityService, BookingService, ConfirmationService, EventService, NotificationService,
    ReminderScheduler, SlotService,
};
use crate::store::{AvailabilityStore, BookingStore, EventStore, NotificationStore};

/// Application state shared across all handlers via [`axum::extract::State`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Availability management.
    pub availability: AvailabilityService,
    /// Booking requests and listings.
    pub bookings: BookingService,
    /// Invite accept/deny workflow.
    pub confirmations: ConfirmationService,
    /// Calendar event management.
    pub events: EventService,
    /// Notification dispatch and inbox queries.
    pub notifications: NotificationService,
    /// Slot generation.
    pub slots: SlotService,
    /// Reminder timer registry.
    pub reminders: Arc<ReminderScheduler>,
    /// Push-event broadcast bus.
    pub event_bus: EventBus,
    /// Calendar event store; startup reads it back from the mirror.
    pub event_store: Arc<EventStore>,
    /// Gateway configuration.
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Wires the stores, services, bus and timers together.
    #[must_use]
    pub fn build(config: GatewayConfig, persistence: Option<Arc<PostgresPersistence>>) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let availability_store = Arc::new(AvailabilityStore::new());
        let booking_store = Arc::new(BookingStore::new());
        let event_store = Arc::new(EventStore::new());
        let notification_store = Arc::new(NotificationStore::new());

        let notifications = NotificationService::new(
            notification_store,
            event_bus.clone(),
            persistence.clone(),
        );
        let reminders = Arc::new(ReminderScheduler::new(
            Arc::clone(&event_store),
            notifications.clone(),
            config.reminder_lead(),
        ));
        let availability =
            AvailabilityService::new(Arc::clone(&availability_store), notifications.clone());
        let bookings = BookingService::new(Arc::clone(&booking_store), notifications.clone());
        let confirmations = ConfirmationService::new(
            Arc::clone(&booking_store),
            Arc::clone(&event_store),
            notifications.clone(),
            Arc::clone(&reminders),
            persistence.clone(),
        );
        let events = EventService::new(
            Arc::clone(&event_store),
            Arc::clone(&reminders),
            notifications.clone(),
            persistence,
        );
        let slots = SlotService::new(
            availability_store,
            booking_store,
            config.session(),
            config.buffer(),
        );

        Self {
            availability,
            bookings,
            confirmations,
            events,
            notifications,
            slots,
            reminders,
            event_bus,
            event_store,
            config: Arc::new(config),
        }
    }
}
