//! Push events broadcast to WebSocket subscribers.
//!
//! Every notification-worthy mutation publishes a [`PushEvent`] through the
//! [`super::EventBus`]. Connections forward events for the rooms they have
//! joined; the live channel is a hint, not a delivery guarantee — the
//! persisted notification row is the durable fallback.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AvailabilityId, Notification, UserId};

/// Event pushed to a single recipient's room (`user_<id>`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PushEvent {
    /// A notification was persisted for the recipient.
    NotificationCreated {
        /// Recipient user id (room key).
        user_id: UserId,
        /// The freshly persisted notification.
        notification: Notification,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },

    /// One of the provider's availability rules was deleted.
    AvailabilityRemoved {
        /// Provider user id (room key).
        user_id: UserId,
        /// The removed rule.
        availability_id: AvailabilityId,
        /// Publication timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PushEvent {
    /// Returns the recipient whose room this event targets.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::NotificationCreated { user_id, .. }
            | Self::AvailabilityRemoved { user_id, .. } => *user_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::NotificationCreated { .. } => "notification_created",
            Self::AvailabilityRemoved { .. } => "availability_removed",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn availability_removed_event_type() {
        let user = UserId::new();
        let event = PushEvent::AvailabilityRemoved {
            user_id: user,
            availability_id: AvailabilityId::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "availability_removed");
        assert_eq!(event.user_id(), user);
    }

    #[test]
    fn push_event_serializes_with_tag() {
        let event = PushEvent::AvailabilityRemoved {
            user_id: UserId::new(),
            availability_id: AvailabilityId::new(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"availability_removed\""));
    }
}
