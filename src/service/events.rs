//! Calendar event management.
//!
//! User-created events (custom, exercise, meditation) are managed here;
//! `Meeting` events are created only by the confirmation workflow and
//! their times cannot be edited directly. Every write keeps the reminder
//! registry in step: create arms, reschedule re-arms, delete disarms.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{CalendarEvent, EventId, EventKind, NotificationKind, UserId};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;
use crate::service::notifications::{NewNotification, NotificationService};
use crate::service::reminders::ReminderScheduler;
use crate::store::EventStore;

/// Parameters for creating a user event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Calendar the event lands on.
    pub owner_id: UserId,
    /// Absolute start instant.
    pub start: DateTime<Utc>,
    /// Absolute end instant (exclusive).
    pub end: DateTime<Utc>,
    /// What the event represents. `Meeting` is rejected.
    pub kind: EventKind,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional location.
    pub location: Option<String>,
}

/// Partial update for an event; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New start instant.
    pub start: Option<DateTime<Utc>>,
    /// New end instant.
    pub end: Option<DateTime<Utc>>,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New location; `Some(None)` clears it.
    pub location: Option<Option<String>>,
}

impl EventPatch {
    fn touches_times(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Manages user calendar events and their reminders.
#[derive(Debug, Clone)]
pub struct EventService {
    events: Arc<EventStore>,
    reminders: Arc<ReminderScheduler>,
    notifications: NotificationService,
    persistence: Option<Arc<PostgresPersistence>>,
}

impl EventService {
    /// Creates a new event service.
    #[must_use]
    pub fn new(
        events: Arc<EventStore>,
        reminders: Arc<ReminderScheduler>,
        notifications: NotificationService,
        persistence: Option<Arc<PostgresPersistence>>,
    ) -> Self {
        Self {
            events,
            reminders,
            notifications,
            persistence,
        }
    }

    /// Creates an event on the owner's calendar, arms its reminder and
    /// notifies the owner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an inverted window, a
    /// start in the past, or a `Meeting` kind.
    pub async fn create(&self, new: NewEvent) -> Result<CalendarEvent, GatewayError> {
        if new.kind == EventKind::Meeting {
            return Err(GatewayError::Validation(
                "meeting events are created by the booking workflow".to_string(),
            ));
        }
        if new.end <= new.start {
            return Err(GatewayError::Validation(
                "event end must be after its start".to_string(),
            ));
        }
        if new.start < Utc::now() {
            return Err(GatewayError::Validation(
                "event must start in the future".to_string(),
            ));
        }

        let event = CalendarEvent {
            id: EventId::new(),
            owner_id: new.owner_id,
            created_by: new.owner_id,
            start: new.start,
            end: new.end,
            kind: new.kind,
            title: new.title,
            description: new.description,
            location: new.location,
            booking_id: None,
        };
        let event = self.events.insert(event).await?;
        self.mirror_save(&event).await;
        self.reminders.arm(&event).await;

        let _ = self
            .notifications
            .create(NewNotification {
                user_id: event.owner_id,
                message: format!("New event scheduled: {}", event.title),
                kind: NotificationKind::EventCreated,
                event_id: Some(event.id),
                booking_id: None,
                response: None,
            })
            .await;

        tracing::info!(event_id = %event.id, owner_id = %event.owner_id, "event created");
        Ok(event)
    }

    /// Applies a partial update to an event, re-arming its reminder when
    /// the start moves.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::EventNotFound`] for an unknown id.
    /// - [`GatewayError::Validation`] for time edits on a `Meeting` event
    ///   or an inverted resulting window.
    pub async fn update(
        &self,
        id: EventId,
        patch: EventPatch,
    ) -> Result<CalendarEvent, GatewayError> {
        let current = self.events.get(id).await?;
        if current.kind == EventKind::Meeting && patch.touches_times() {
            return Err(GatewayError::Validation(
                "meeting times are managed by the booking workflow".to_string(),
            ));
        }
        let new_start = patch.start.unwrap_or(current.start);
        let new_end = patch.end.unwrap_or(current.end);
        if new_end <= new_start {
            return Err(GatewayError::Validation(
                "event end must be after its start".to_string(),
            ));
        }

        let start_moved = new_start != current.start;
        let updated = self
            .events
            .update(id, |e| {
                e.start = new_start;
                e.end = new_end;
                if let Some(title) = patch.title {
                    e.title = title;
                }
                if let Some(description) = patch.description {
                    e.description = description;
                }
                if let Some(location) = patch.location {
                    e.location = location;
                }
            })
            .await?;
        self.mirror_save(&updated).await;

        if start_moved {
            self.reminders.disarm(updated.id).await;
            self.reminders.arm(&updated).await;
        }

        let _ = self
            .notifications
            .create(NewNotification {
                user_id: updated.owner_id,
                message: format!("Event updated: {}", updated.title),
                kind: NotificationKind::EventUpdated,
                event_id: Some(updated.id),
                booking_id: None,
                response: None,
            })
            .await;

        Ok(updated)
    }

    /// Deletes an event, disarming its reminder first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id.
    pub async fn delete(&self, id: EventId) -> Result<CalendarEvent, GatewayError> {
        // Disarm before removing so a timer can never fire for a row that
        // is about to disappear.
        self.reminders.disarm(id).await;
        let removed = self.events.remove(id).await?;
        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.delete_event(removed.id).await
        {
            tracing::warn!(event_id = %removed.id, error = %e, "event mirror delete failed");
        }
        tracing::info!(event_id = %removed.id, "event deleted");
        Ok(removed)
    }

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id.
    pub async fn get(&self, id: EventId) -> Result<CalendarEvent, GatewayError> {
        self.events.get(id).await
    }

    /// Future events on a user's calendar, ordered by start.
    pub async fn upcoming_for_user(&self, user_id: UserId) -> Vec<CalendarEvent> {
        self.events.upcoming_for_owner(user_id, Utc::now()).await
    }

    async fn mirror_save(&self, event: &CalendarEvent) {
        if let Some(persistence) = &self.persistence
            && let Err(e) = persistence.save_event(event).await
        {
            tracing::warn!(event_id = %event.id, error = %e, "event mirror write failed");
        }
    }
}
