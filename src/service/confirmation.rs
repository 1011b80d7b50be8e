//! The accept/deny workflow for meeting invites.
//!
//! Accepting an invite is the only path that confirms a booking. The
//! decision runs under the provider's booking shard write lock: re-read
//! the booking, re-check the confirmed set, write the event pair and flip
//! the status, all before the lock drops. Two concurrent accepts for
//! overlapping windows therefore serialize, and the loser fails cleanly.

use std::sync::Arc;

use crate::domain::{
    Booking, CalendarEvent, NotificationId, NotificationKind, ResponseStatus,
};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;
use crate::service::notifications::{NewNotification, NotificationService};
use crate::service::reminders::ReminderScheduler;
use crate::store::{BookingStore, EventStore};

/// Resolves meeting invites into confirmed or cancelled bookings.
#[derive(Debug, Clone)]
pub struct ConfirmationService {
    bookings: Arc<BookingStore>,
    events: Arc<EventStore>,
    notifications: NotificationService,
    reminders: Arc<ReminderScheduler>,
    persistence: Option<Arc<PostgresPersistence>>,
}

impl ConfirmationService {
    /// Creates a new confirmation service.
    #[must_use]
    pub fn new(
        bookings: Arc<BookingStore>,
        events: Arc<EventStore>,
        notifications: NotificationService,
        reminders: Arc<ReminderScheduler>,
        persistence: Option<Arc<PostgresPersistence>>,
    ) -> Self {
        Self {
            bookings,
            events,
            notifications,
            reminders,
            persistence,
        }
    }

    /// Records the provider's answer to a meeting invite.
    ///
    /// On `Accepted`: re-checks the provider's confirmed set, creates the
    /// paired calendar events, confirms the booking, arms both reminders
    /// and tells the client. On `Denied`: cancels the booking and tells
    /// the client. Either way the invite is marked resolved, exactly once.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for a `Pending` answer or a
    ///   notification that is not an answerable invite.
    /// - [`GatewayError::NotificationNotFound`] /
    ///   [`GatewayError::BookingNotFound`] for unknown ids.
    /// - [`GatewayError::NotificationAlreadyResolved`] if the invite or
    ///   its booking was already settled.
    /// - [`GatewayError::SlotConflict`] if accepting would overlap a
    ///   booking confirmed in the meantime; the invite stays answerable.
    pub async fn respond(
        &self,
        notification_id: NotificationId,
        response: ResponseStatus,
    ) -> Result<Booking, GatewayError> {
        if response == ResponseStatus::Pending {
            return Err(GatewayError::Validation(
                "response must be ACCEPTED or DENIED".to_string(),
            ));
        }

        let invite = self.notifications.store().get(notification_id).await?;
        match invite.response {
            None => {
                return Err(GatewayError::Validation(
                    "notification is not an answerable invite".to_string(),
                ));
            }
            Some(ResponseStatus::Pending) => {}
            Some(_) => {
                return Err(GatewayError::NotificationAlreadyResolved(notification_id));
            }
        }
        let booking_id = invite.booking_id.ok_or_else(|| {
            GatewayError::Validation("invite carries no booking reference".to_string())
        })?;
        let booking = self.bookings.get(booking_id).await?;

        let outcome = if response == ResponseStatus::Accepted {
            self.accept(&booking, notification_id).await?
        } else {
            self.deny(&booking, notification_id).await?
        };

        // The booking transition above is the arbitration point; recording
        // the answer afterwards cannot fail the workflow.
        self.notifications
            .store()
            .resolve(notification_id, response)
            .await?;

        Ok(outcome)
    }

    async fn accept(
        &self,
        booking: &Booking,
        notification_id: NotificationId,
    ) -> Result<Booking, GatewayError> {
        let shard = self.bookings.provider_shard(booking.provider_id).await;
        let mut guard = shard.write().await;

        // Re-read under the lock: another accept may have settled this
        // booking between the invite lookup and here.
        let current = guard
            .get(booking.id)
            .ok_or(GatewayError::BookingNotFound(booking.id))?;
        if current.status != crate::domain::BookingStatus::Pending {
            return Err(GatewayError::NotificationAlreadyResolved(notification_id));
        }
        if guard.has_confirmed_overlap(booking.start, booking.end, Some(booking.id)) {
            // The window was taken by a competing booking; this invite
            // stays pending so the provider sees the conflict.
            return Err(GatewayError::SlotConflict);
        }

        let client_event = CalendarEvent::meeting(
            booking.user_id,
            booking.provider_id,
            booking.start,
            booking.end,
            "Session with your psychologist",
            booking.id,
        );
        let provider_event = CalendarEvent::meeting(
            booking.provider_id,
            booking.user_id,
            booking.start,
            booking.end,
            "Session with your client",
            booking.id,
        );
        self.events
            .insert_pair(client_event.clone(), provider_event.clone())
            .await?;
        let confirmed = guard.set_confirmed(booking.id, client_event.id, provider_event.id)?;
        drop(guard);

        tracing::info!(
            booking_id = %confirmed.id,
            provider_id = %confirmed.provider_id,
            "booking confirmed"
        );

        for event in [&client_event, &provider_event] {
            if let Some(persistence) = &self.persistence
                && let Err(e) = persistence.save_event(event).await
            {
                tracing::warn!(event_id = %event.id, error = %e, "event mirror write failed");
            }
            self.reminders.arm(event).await;
        }

        let _ = self
            .notifications
            .create(NewNotification {
                user_id: confirmed.user_id,
                message: "Your session request was accepted".to_string(),
                kind: NotificationKind::EventUpdated,
                event_id: Some(client_event.id),
                booking_id: Some(confirmed.id),
                response: None,
            })
            .await;

        Ok(confirmed)
    }

    async fn deny(
        &self,
        booking: &Booking,
        notification_id: NotificationId,
    ) -> Result<Booking, GatewayError> {
        let shard = self.bookings.provider_shard(booking.provider_id).await;
        let mut guard = shard.write().await;
        let current = guard
            .get(booking.id)
            .ok_or(GatewayError::BookingNotFound(booking.id))?;
        if current.status != crate::domain::BookingStatus::Pending {
            return Err(GatewayError::NotificationAlreadyResolved(notification_id));
        }
        let cancelled = guard.set_cancelled(booking.id)?;
        drop(guard);

        tracing::info!(booking_id = %cancelled.id, "booking denied");

        let _ = self
            .notifications
            .create(NewNotification {
                user_id: cancelled.user_id,
                message: "Your session request was declined, please pick another time".to_string(),
                kind: NotificationKind::EventUpdated,
                event_id: None,
                booking_id: Some(cancelled.id),
                response: None,
            })
            .await;

        Ok(cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, EventBus, Notification, UserId};
    use crate::service::booking::BookingService;
    use crate::store::NotificationStore;
    use chrono::{Duration, Utc};

    struct Fixture {
        bookings: BookingService,
        confirmations: ConfirmationService,
        events: Arc<EventStore>,
        reminders: Arc<ReminderScheduler>,
        notifications: NotificationService,
    }

    fn make_fixture() -> Fixture {
        let booking_store = Arc::new(BookingStore::new());
        let events = Arc::new(EventStore::new());
        let bus = EventBus::new(100);
        let notifications =
            NotificationService::new(Arc::new(NotificationStore::new()), bus, None);
        let reminders = Arc::new(ReminderScheduler::new(
            Arc::clone(&events),
            notifications.clone(),
            Duration::minutes(10),
        ));
        Fixture {
            bookings: BookingService::new(Arc::clone(&booking_store), notifications.clone()),
            confirmations: ConfirmationService::new(
                booking_store,
                Arc::clone(&events),
                notifications.clone(),
                Arc::clone(&reminders),
                None,
            ),
            events,
            reminders,
            notifications,
        }
    }

    async fn request(fixture: &Fixture, provider: UserId, hour: i64) -> (Booking, Notification) {
        let start = Utc::now() + Duration::days(1) + Duration::hours(hour);
        let Ok(pair) = fixture
            .bookings
            .request_booking(UserId::new(), provider, start, start + Duration::hours(1))
            .await
        else {
            panic!("request failed");
        };
        pair
    }

    #[tokio::test]
    async fn accept_confirms_and_creates_the_event_pair() {
        let fixture = make_fixture();
        let provider = UserId::new();
        let (booking, invite) = request(&fixture, provider, 0).await;

        let result = fixture
            .confirmations
            .respond(invite.id, ResponseStatus::Accepted)
            .await;
        let Ok(confirmed) = result else {
            panic!("respond failed");
        };
        assert_eq!(confirmed.status, BookingStatus::Confirmed);

        let (Some(client_event_id), Some(provider_event_id)) =
            (confirmed.event_id, confirmed.provider_event_id)
        else {
            panic!("event backlinks missing");
        };
        let Ok(client_event) = fixture.events.get(client_event_id).await else {
            panic!("client event missing");
        };
        let Ok(provider_event) = fixture.events.get(provider_event_id).await else {
            panic!("provider event missing");
        };
        assert_eq!(client_event.owner_id, booking.user_id);
        assert_eq!(provider_event.owner_id, provider);
        assert_eq!(client_event.booking_id, Some(booking.id));
        assert_eq!(provider_event.booking_id, Some(booking.id));

        // Both halves carry reminders.
        assert!(fixture.reminders.is_armed(client_event_id).await);
        assert!(fixture.reminders.is_armed(provider_event_id).await);

        // The invite is settled.
        let Ok(stored) = fixture.notifications.store().get(invite.id).await else {
            panic!("invite missing");
        };
        assert_eq!(stored.response, Some(ResponseStatus::Accepted));
    }

    #[tokio::test]
    async fn deny_cancels_and_notifies_the_client() {
        let fixture = make_fixture();
        let provider = UserId::new();
        let (booking, invite) = request(&fixture, provider, 0).await;

        let result = fixture
            .confirmations
            .respond(invite.id, ResponseStatus::Denied)
            .await;
        let Ok(cancelled) = result else {
            panic!("respond failed");
        };
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(cancelled.event_id.is_none());

        // The client hears about it.
        let inbox = fixture.notifications.for_user(booking.user_id).await;
        assert!(
            inbox
                .iter()
                .any(|n| n.kind == crate::domain::NotificationKind::EventUpdated)
        );
    }

    #[tokio::test]
    async fn second_answer_is_rejected() {
        let fixture = make_fixture();
        let (_, invite) = request(&fixture, UserId::new(), 0).await;

        let first = fixture
            .confirmations
            .respond(invite.id, ResponseStatus::Accepted)
            .await;
        assert!(first.is_ok());

        let second = fixture
            .confirmations
            .respond(invite.id, ResponseStatus::Denied)
            .await;
        assert!(matches!(
            second,
            Err(GatewayError::NotificationAlreadyResolved(_))
        ));
    }

    #[tokio::test]
    async fn pending_answer_is_rejected() {
        let fixture = make_fixture();
        let (_, invite) = request(&fixture, UserId::new(), 0).await;
        let result = fixture
            .confirmations
            .respond(invite.id, ResponseStatus::Pending)
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn accept_after_competing_confirmation_conflicts() {
        let fixture = make_fixture();
        let provider = UserId::new();
        let (_, first_invite) = request(&fixture, provider, 0).await;
        let (_, second_invite) = request(&fixture, provider, 0).await;

        let first = fixture
            .confirmations
            .respond(first_invite.id, ResponseStatus::Accepted)
            .await;
        assert!(first.is_ok());

        let second = fixture
            .confirmations
            .respond(second_invite.id, ResponseStatus::Accepted)
            .await;
        assert!(matches!(second, Err(GatewayError::SlotConflict)));

        // The losing invite stays answerable, so the provider can deny it.
        let denied = fixture
            .confirmations
            .respond(second_invite.id, ResponseStatus::Denied)
            .await;
        assert!(denied.is_ok());
    }

    #[tokio::test]
    async fn concurrent_accepts_only_one_confirms() {
        let fixture = Arc::new(make_fixture());
        let provider = UserId::new();
        let mut invites = Vec::new();
        for _ in 0..8 {
            let (_, invite) = request(&fixture, provider, 0).await;
            invites.push(invite.id);
        }

        let mut handles = Vec::new();
        for invite_id in invites {
            let fixture = Arc::clone(&fixture);
            handles.push(tokio::spawn(async move {
                fixture
                    .confirmations
                    .respond(invite_id, ResponseStatus::Accepted)
                    .await
            }));
        }

        let mut confirmed = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => confirmed += 1,
                Ok(Err(GatewayError::SlotConflict)) => conflicts += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(confirmed, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn plain_notification_is_not_answerable() {
        let fixture = make_fixture();
        let note = fixture
            .notifications
            .create(crate::service::notifications::NewNotification {
                user_id: UserId::new(),
                message: "Your booking was confirmed".to_string(),
                kind: crate::domain::NotificationKind::EventUpdated,
                event_id: None,
                booking_id: None,
                response: None,
            })
            .await;
        let result = fixture
            .confirmations
            .respond(note.id, ResponseStatus::Accepted)
            .await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }
}
