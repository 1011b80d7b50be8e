//! Booking requests and the invite that starts the confirmation workflow.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingId, Notification, NotificationKind, ResponseStatus, UserId};
use crate::error::GatewayError;
use crate::service::notifications::{NewNotification, NotificationService};
use crate::store::BookingStore;

/// Accepts booking requests and records them in the ledger.
///
/// A request that passes validation and the conflict check lands as a
/// `Pending` booking plus a `meeting_invite` notification on the
/// provider's side. Nothing is confirmed here; that happens when the
/// provider answers the invite.
#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<BookingStore>,
    notifications: NotificationService,
}

impl BookingService {
    /// Creates a new booking service.
    #[must_use]
    pub fn new(bookings: Arc<BookingStore>, notifications: NotificationService) -> Self {
        Self {
            bookings,
            notifications,
        }
    }

    /// Records a client's request for a session and notifies the provider.
    ///
    /// Returns the `Pending` booking together with the invite sent to the
    /// provider.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for an inverted window, a start in
    ///   the past, or a client booking themselves.
    /// - [`GatewayError::SlotConflict`] if a confirmed booking already
    ///   occupies the window.
    pub async fn request_booking(
        &self,
        user_id: UserId,
        provider_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(Booking, Notification), GatewayError> {
        if end <= start {
            return Err(GatewayError::Validation(
                "booking end must be after its start".to_string(),
            ));
        }
        if start < Utc::now() {
            return Err(GatewayError::Validation(
                "booking must start in the future".to_string(),
            ));
        }
        if user_id == provider_id {
            return Err(GatewayError::Validation(
                "cannot book a session with yourself".to_string(),
            ));
        }

        let booking = self
            .bookings
            .insert_pending_checked(user_id, provider_id, start, end)
            .await?;
        tracing::info!(
            booking_id = %booking.id,
            user_id = %user_id,
            provider_id = %provider_id,
            start = %start,
            "booking requested"
        );

        let invite = self
            .notifications
            .create(NewNotification {
                user_id: provider_id,
                message: format!("A client requested a session on {}", start.format("%Y-%m-%d %H:%M UTC")),
                kind: NotificationKind::MeetingInvite,
                event_id: None,
                booking_id: Some(booking.id),
                response: Some(ResponseStatus::Pending),
            })
            .await;

        Ok((booking, invite))
    }

    /// Looks up a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] for an unknown id.
    pub async fn get(&self, id: BookingId) -> Result<Booking, GatewayError> {
        self.bookings.get(id).await
    }

    /// All bookings made by a client, ordered by start time.
    pub async fn user_bookings(&self, user_id: UserId) -> Vec<Booking> {
        self.bookings.user_bookings(user_id).await
    }

    /// Pending bookings awaiting a provider's answer, ordered by start.
    pub async fn pending_for_provider(&self, provider_id: UserId) -> Vec<Booking> {
        self.bookings.pending_for_provider(provider_id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, EventBus, EventId, PushEvent};
    use crate::store::NotificationStore;
    use chrono::Duration;

    fn make_service() -> (BookingService, Arc<BookingStore>, EventBus) {
        let bookings = Arc::new(BookingStore::new());
        let bus = EventBus::new(100);
        let notifications =
            NotificationService::new(Arc::new(NotificationStore::new()), bus.clone(), None);
        let service = BookingService::new(Arc::clone(&bookings), notifications);
        (service, bookings, bus)
    }

    fn tomorrow_at(hour: i64) -> DateTime<Utc> {
        Utc::now() + Duration::days(1) + Duration::hours(hour)
    }

    #[tokio::test]
    async fn request_creates_pending_booking_and_invite() {
        let (service, _, bus) = make_service();
        let mut rx = bus.subscribe();
        let (client, provider) = (UserId::new(), UserId::new());

        let result = service
            .request_booking(client, provider, tomorrow_at(9), tomorrow_at(10))
            .await;
        let Ok((booking, invite)) = result else {
            panic!("request failed");
        };
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(invite.user_id, provider);
        assert_eq!(invite.booking_id, Some(booking.id));
        assert_eq!(invite.response, Some(ResponseStatus::Pending));

        // The invite reaches the provider's room.
        let Ok(PushEvent::NotificationCreated { user_id, .. }) = rx.recv().await else {
            panic!("expected notification push");
        };
        assert_eq!(user_id, provider);
    }

    #[tokio::test]
    async fn request_rejects_past_start() {
        let (service, _, _) = make_service();
        let result = service
            .request_booking(
                UserId::new(),
                UserId::new(),
                Utc::now() - Duration::hours(1),
                Utc::now(),
            )
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn request_rejects_inverted_window() {
        let (service, _, _) = make_service();
        let result = service
            .request_booking(UserId::new(), UserId::new(), tomorrow_at(10), tomorrow_at(9))
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn request_rejects_self_booking() {
        let (service, _, _) = make_service();
        let user = UserId::new();
        let result = service
            .request_booking(user, user, tomorrow_at(9), tomorrow_at(10))
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn request_against_confirmed_window_conflicts() {
        let (service, bookings, _) = make_service();
        let provider = UserId::new();
        let Ok((booking, _)) = service
            .request_booking(UserId::new(), provider, tomorrow_at(9), tomorrow_at(10))
            .await
        else {
            panic!("request failed");
        };
        {
            let shard = bookings.provider_shard(provider).await;
            let mut guard = shard.write().await;
            let _ = guard.set_confirmed(booking.id, EventId::new(), EventId::new());
        }

        let result = service
            .request_booking(UserId::new(), provider, tomorrow_at(9), tomorrow_at(10))
            .await;
        assert!(matches!(result, Err(GatewayError::SlotConflict)));
    }

    #[tokio::test]
    async fn listings_flow_through() {
        let (service, _, _) = make_service();
        let (client, provider) = (UserId::new(), UserId::new());
        let _ = service
            .request_booking(client, provider, tomorrow_at(9), tomorrow_at(10))
            .await;

        assert_eq!(service.user_bookings(client).await.len(), 1);
        assert_eq!(service.pending_for_provider(provider).await.len(), 1);
    }
}
