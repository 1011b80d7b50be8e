//! Storage for calendar events, including atomic pair creation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{CalendarEvent, EventId, UserId};
use crate::error::GatewayError;

/// In-memory store of calendar events.
///
/// [`EventStore::insert_pair`] is the atomicity seam for confirmed
/// bookings: both meeting events are written under one lock acquisition,
/// so a reader can never observe exactly one half of the pair.
#[derive(Debug, Default)]
pub struct EventStore {
    events: RwLock<HashMap<EventId, CalendarEvent>>,
}

impl EventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] on an id collision, which would
    /// indicate a broken UUID source.
    pub async fn insert(&self, event: CalendarEvent) -> Result<CalendarEvent, GatewayError> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(GatewayError::Internal(format!(
                "event {} already exists",
                event.id
            )));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    /// Inserts two events as one unit: both land or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if either id already exists; in
    /// that case nothing is written.
    pub async fn insert_pair(
        &self,
        first: CalendarEvent,
        second: CalendarEvent,
    ) -> Result<(), GatewayError> {
        let mut events = self.events.write().await;
        if events.contains_key(&first.id) || events.contains_key(&second.id) {
            return Err(GatewayError::Internal(
                "event id collision during pair creation".to_string(),
            ));
        }
        events.insert(first.id, first);
        events.insert(second.id, second);
        Ok(())
    }

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id.
    pub async fn get(&self, id: EventId) -> Result<CalendarEvent, GatewayError> {
        self.events
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GatewayError::EventNotFound(id))
    }

    /// Applies a mutation to an event, returning the updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id.
    pub async fn update<F>(&self, id: EventId, mutate: F) -> Result<CalendarEvent, GatewayError>
    where
        F: FnOnce(&mut CalendarEvent),
    {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id).ok_or(GatewayError::EventNotFound(id))?;
        mutate(event);
        Ok(event.clone())
    }

    /// Removes an event, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] for an unknown id.
    pub async fn remove(&self, id: EventId) -> Result<CalendarEvent, GatewayError> {
        self.events
            .write()
            .await
            .remove(&id)
            .ok_or(GatewayError::EventNotFound(id))
    }

    /// All events starting after `now`, ordered by start. This is the
    /// durable input that the reminder scheduler re-arms from at startup.
    pub async fn future_events(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        let events = self.events.read().await;
        let mut result: Vec<CalendarEvent> =
            events.values().filter(|e| e.start > now).cloned().collect();
        result.sort_by_key(|e| e.start);
        result
    }

    /// Future events a user is involved in, as owner or creator.
    pub async fn future_events_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let events = self.events.read().await;
        let mut result: Vec<CalendarEvent> = events
            .values()
            .filter(|e| e.start > now && e.involves(user_id))
            .cloned()
            .collect();
        result.sort_by_key(|e| e.start);
        result
    }

    /// Future events on a user's own calendar, ordered by start.
    pub async fn upcoming_for_owner(
        &self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let events = self.events.read().await;
        let mut result: Vec<CalendarEvent> = events
            .values()
            .filter(|e| e.owner_id == owner_id && e.start > now)
            .cloned()
            .collect();
        result.sort_by_key(|e| e.start);
        result
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BookingId;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        let Some(dt) = Utc.with_ymd_and_hms(2030, 6, 3, hour, 0, 0).single() else {
            panic!("valid timestamp");
        };
        dt
    }

    fn meeting(owner: UserId, hour: u32) -> CalendarEvent {
        CalendarEvent::meeting(
            owner,
            UserId::new(),
            at(hour),
            at(hour + 1),
            "Session",
            BookingId::new(),
        )
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = EventStore::new();
        let event = meeting(UserId::new(), 9);
        let id = event.id;
        assert!(store.insert(event).await.is_ok());
        assert!(store.get(id).await.is_ok());
    }

    #[tokio::test]
    async fn pair_is_all_or_nothing() {
        let store = EventStore::new();
        let a = meeting(UserId::new(), 9);
        let b = meeting(UserId::new(), 9);
        let a_id = a.id;

        // Pre-insert one half to force the collision path.
        let _ = store.insert(a.clone()).await;
        let result = store.insert_pair(a, b.clone()).await;
        assert!(result.is_err());
        // The second half must not have been written.
        assert!(store.get(b.id).await.is_err());
        assert!(store.get(a_id).await.is_ok());
    }

    #[tokio::test]
    async fn pair_inserts_both() {
        let store = EventStore::new();
        let a = meeting(UserId::new(), 9);
        let b = meeting(UserId::new(), 9);
        let (a_id, b_id) = (a.id, b.id);
        assert!(store.insert_pair(a, b).await.is_ok());
        assert!(store.get(a_id).await.is_ok());
        assert!(store.get(b_id).await.is_ok());
    }

    #[tokio::test]
    async fn future_events_excludes_past_and_sorts() {
        let store = EventStore::new();
        let _ = store.insert(meeting(UserId::new(), 14)).await;
        let _ = store.insert(meeting(UserId::new(), 9)).await;
        let _ = store.insert(meeting(UserId::new(), 6)).await;

        let future = store.future_events(at(8)).await;
        let starts: Vec<DateTime<Utc>> = future.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![at(9), at(14)]);
    }

    #[tokio::test]
    async fn future_events_for_user_matches_creator_too() {
        let store = EventStore::new();
        let user = UserId::new();
        let owned = meeting(user, 9);
        let mut created = meeting(UserId::new(), 10);
        created.created_by = user;
        let _ = store.insert(owned).await;
        let _ = store.insert(created).await;
        let _ = store.insert(meeting(UserId::new(), 11)).await;

        let involved = store.future_events_for_user(user, at(8)).await;
        assert_eq!(involved.len(), 2);
    }

    #[tokio::test]
    async fn update_reschedules() {
        let store = EventStore::new();
        let event = meeting(UserId::new(), 9);
        let id = event.id;
        let _ = store.insert(event).await;

        let updated = store
            .update(id, |e| {
                e.start = at(11);
                e.end = at(12);
            })
            .await;
        let Ok(updated) = updated else {
            panic!("update failed");
        };
        assert_eq!(updated.start, at(11));
    }

    #[tokio::test]
    async fn remove_then_missing() {
        let store = EventStore::new();
        let event = meeting(UserId::new(), 9);
        let id = event.id;
        let _ = store.insert(event).await;
        assert!(store.remove(id).await.is_ok());
        assert!(store.remove(id).await.is_err());
    }
}
