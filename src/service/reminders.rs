//! Reminder scheduling for calendar events.
//!
//! Each future event gets one in-process timer that fires a fixed lead
//! before the event starts and dispatches an `event_reminder`
//! notification to the event's owner. The timer registry is volatile;
//! durability comes from the event store, which [`ReminderScheduler::rearm_all`]
//! replays at startup.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::domain::{CalendarEvent, EventId, NotificationKind};
use crate::service::notifications::{NewNotification, NotificationService};
use crate::store::EventStore;

/// One armed timer. The generation ties a fired task back to the entry it
/// was armed under, so a stale task never removes a newer timer for the
/// same event.
#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    handle: AbortHandle,
}

/// Keyed registry of reminder timers, one per event id.
///
/// Re-arming an event replaces its timer; disarming cancels it. All
/// mutations go through the registry mutex, held only for map access,
/// never across an await on the timer itself.
#[derive(Debug)]
pub struct ReminderScheduler {
    timers: Arc<Mutex<HashMap<EventId, ArmedTimer>>>,
    generations: AtomicU64,
    events: Arc<EventStore>,
    notifications: NotificationService,
    lead: Duration,
}

impl ReminderScheduler {
    /// Creates a scheduler with the given reminder lead.
    #[must_use]
    pub fn new(events: Arc<EventStore>, notifications: NotificationService, lead: Duration) -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
            events,
            notifications,
            lead,
        }
    }

    /// Arms (or re-arms) the reminder for an event.
    ///
    /// A timer already registered for this event is cancelled first. If
    /// the fire instant has already passed, nothing is armed.
    pub async fn arm(&self, event: &CalendarEvent) {
        let fire_at = event.start - self.lead;
        let now = Utc::now();
        if fire_at <= now {
            tracing::debug!(event_id = %event.id, "reminder fire time already passed, skipping");
            self.disarm(event.id).await;
            return;
        }
        let Ok(delay) = (fire_at - now).to_std() else {
            return;
        };

        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let notifications = self.notifications.clone();
        let event_id = event.id;
        let owner_id = event.owner_id;
        let title = event.title.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = notifications
                .create(NewNotification {
                    user_id: owner_id,
                    message: format!("Reminder: {title} is starting soon"),
                    kind: NotificationKind::EventReminder,
                    event_id: Some(event_id),
                    booking_id: None,
                    response: None,
                })
                .await;
            // Only remove the entry this task was armed under.
            let mut timers = timers.lock().await;
            if timers.get(&event_id).is_some_and(|t| t.generation == generation) {
                timers.remove(&event_id);
            }
        });

        let mut timers = self.timers.lock().await;
        if let Some(previous) = timers.insert(
            event_id,
            ArmedTimer {
                generation,
                handle: task.abort_handle(),
            },
        ) {
            previous.handle.abort();
        }
        tracing::debug!(event_id = %event_id, fire_at = %fire_at, "reminder armed");
    }

    /// Cancels the reminder for an event, if one is armed. Idempotent.
    pub async fn disarm(&self, event_id: EventId) {
        let mut timers = self.timers.lock().await;
        if let Some(timer) = timers.remove(&event_id) {
            timer.handle.abort();
            tracing::debug!(event_id = %event_id, "reminder disarmed");
        }
    }

    /// Cancels the reminders for every future event a user is involved in.
    pub async fn disarm_all_for_user(&self, user_id: crate::domain::UserId) {
        let events = self.events.future_events_for_user(user_id, Utc::now()).await;
        for event in events {
            self.disarm(event.id).await;
        }
    }

    /// Rebuilds the timer registry from the durable event set.
    ///
    /// Called once at startup so reminders survive a restart. Events whose
    /// fire instant has already passed are skipped silently. Returns the
    /// number of timers armed.
    pub async fn rearm_all(&self) -> usize {
        let events = self.events.future_events(Utc::now()).await;
        let mut armed = 0;
        for event in &events {
            self.arm(event).await;
            if self.is_armed(event.id).await {
                armed += 1;
            }
        }
        tracing::info!(armed, "reminder timers rebuilt");
        armed
    }

    /// Number of currently armed timers.
    pub async fn armed_count(&self) -> usize {
        self.timers.lock().await.len()
    }

    /// Whether a timer is armed for the given event.
    pub async fn is_armed(&self, event_id: EventId) -> bool {
        self.timers.lock().await.contains_key(&event_id)
    }
}
