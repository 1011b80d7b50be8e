//! Notification dispatcher: persist first, then push.
//!
//! Every notification is written to the store (and, when enabled, mirrored
//! to Postgres) before anything is pushed. The live channel is
//! best-effort: a recipient with no open connection simply finds the row
//! on their next fetch.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    AvailabilityId, BookingId, EventBus, EventId, Notification, NotificationId, NotificationKind,
    PushEvent, ResponseStatus, UserId,
};
use crate::persistence::PostgresPersistence;
use crate::store::NotificationStore;

/// Parameters for creating a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: UserId,
    /// Human-readable message.
    pub message: String,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Related event, if any.
    pub event_id: Option<EventId>,
    /// Related booking, if any.
    pub booking_id: Option<BookingId>,
    /// Initial response state; `Some(Pending)` only for invites.
    pub response: Option<ResponseStatus>,
}

/// Persists notifications and pushes them to per-user rooms.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<NotificationStore>,
    bus: EventBus,
    persistence: Option<Arc<PostgresPersistence>>,
}

impl NotificationService {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(
        store: Arc<NotificationStore>,
        bus: EventBus,
        persistence: Option<Arc<PostgresPersistence>>,
    ) -> Self {
        Self {
            store,
            bus,
            persistence,
        }
    }

    /// Returns a reference to the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<NotificationStore> {
        &self.store
    }

    /// Persists a notification and pushes it to the recipient's room.
    ///
    /// Push and mirror failures are logged, never propagated — the
    /// persisted row is the source of truth.
    pub async fn create(&self, new: NewNotification) -> Notification {
        let notification = Notification {
            id: NotificationId::new(),
            user_id: new.user_id,
            message: new.message,
            kind: new.kind,
            is_read: false,
            created_at: Utc::now(),
            event_id: new.event_id,
            booking_id: new.booking_id,
            response: new.response,
        };
        self.store.insert(notification.clone()).await;

        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.save_notification(&notification).await
        {
            tracing::warn!(notification_id = %notification.id, error = %e, "notification mirror write failed");
        }

        let receivers = self.bus.publish(PushEvent::NotificationCreated {
            user_id: notification.user_id,
            notification: notification.clone(),
            timestamp: Utc::now(),
        });
        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = notification.kind.as_str(),
            receivers,
            "notification dispatched"
        );

        notification
    }

    /// Pushes an `availability_removed` hint to the provider's room.
    pub fn push_availability_removed(&self, user_id: UserId, availability_id: AvailabilityId) {
        let _ = self.bus.publish(PushEvent::AvailabilityRemoved {
            user_id,
            availability_id,
            timestamp: Utc::now(),
        });
    }

    /// All notifications for a user, newest first.
    pub async fn for_user(&self, user_id: UserId) -> Vec<Notification> {
        self.store.for_user(user_id).await
    }

    /// Unread notifications for a user, newest first.
    pub async fn unread_for_user(&self, user_id: UserId) -> Vec<Notification> {
        self.store.unread_for_user(user_id).await
    }

    /// Marks one notification read. Idempotent.
    pub async fn mark_read(&self, id: NotificationId, user_id: UserId) -> bool {
        self.store.mark_read(id, user_id).await
    }

    /// Marks all of a user's notifications read. Idempotent.
    pub async fn mark_all_read(&self, user_id: UserId) -> usize {
        self.store.mark_all_read(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_service() -> (NotificationService, EventBus) {
        let bus = EventBus::new(100);
        let service =
            NotificationService::new(Arc::new(NotificationStore::new()), bus.clone(), None);
        (service, bus)
    }

    fn reminder_for(user_id: UserId) -> NewNotification {
        NewNotification {
            user_id,
            message: "Reminder: your session starts in 10 minutes".to_string(),
            kind: NotificationKind::EventReminder,
            event_id: Some(EventId::new()),
            booking_id: None,
            response: None,
        }
    }

    #[tokio::test]
    async fn create_persists_before_pushing() {
        let (service, bus) = make_service();
        let user = UserId::new();
        let mut rx = bus.subscribe();

        let created = service.create(reminder_for(user)).await;

        // Row is durable regardless of delivery.
        let stored = service.store().get(created.id).await;
        assert!(stored.is_ok());

        let event = rx.recv().await;
        let Ok(PushEvent::NotificationCreated {
            user_id,
            notification,
            ..
        }) = event
        else {
            panic!("expected notification_created push");
        };
        assert_eq!(user_id, user);
        assert_eq!(notification.id, created.id);
    }

    #[tokio::test]
    async fn create_without_receivers_still_persists() {
        let (service, _bus) = make_service();
        let user = UserId::new();
        let created = service.create(reminder_for(user)).await;
        assert_eq!(service.for_user(user).await.len(), 1);
        assert!(!created.is_read);
    }

    #[tokio::test]
    async fn mark_all_read_flows_through() {
        let (service, _bus) = make_service();
        let user = UserId::new();
        let _ = service.create(reminder_for(user)).await;
        let _ = service.create(reminder_for(user)).await;

        assert_eq!(service.unread_for_user(user).await.len(), 2);
        assert_eq!(service.mark_all_read(user).await, 2);
        assert!(service.unread_for_user(user).await.is_empty());
    }

    #[tokio::test]
    async fn availability_removed_is_pushed() {
        let (service, bus) = make_service();
        let mut rx = bus.subscribe();
        let provider = UserId::new();

        service.push_availability_removed(provider, AvailabilityId::new());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected push event");
        };
        assert_eq!(event.event_type_str(), "availability_removed");
        assert_eq!(event.user_id(), provider);
    }
}
