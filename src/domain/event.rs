//! Calendar events and their kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, EventId, UserId};
use crate::error::GatewayError;

/// Discriminates what an event on a user's calendar represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A free-form event created by the user.
    Custom,
    /// One half of a confirmed session; always created in pairs.
    Meeting,
    /// A scheduled guided exercise.
    Exercise,
    /// A scheduled meditation.
    Meditation,
}

impl EventKind {
    /// Stable string form used by the persistence mirror.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Custom => "CUSTOM",
            Self::Meeting => "MEETING",
            Self::Exercise => "EXERCISE",
            Self::Meditation => "MEDITATION",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOM" => Ok(Self::Custom),
            "MEETING" => Ok(Self::Meeting),
            "EXERCISE" => Ok(Self::Exercise),
            "MEDITATION" => Ok(Self::Meditation),
            other => Err(GatewayError::Validation(format!(
                "unknown event kind: {other:?}"
            ))),
        }
    }
}

/// An entry on a user's calendar.
///
/// A confirmed booking owns exactly two `Meeting` events — one on the
/// client's calendar, one on the provider's — created together or not at
/// all, both backlinked through `booking_id`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarEvent {
    /// Event identifier.
    pub id: EventId,
    /// The user on whose calendar this event appears.
    pub owner_id: UserId,
    /// The user who created the event.
    pub created_by: UserId,
    /// Absolute start instant.
    pub start: DateTime<Utc>,
    /// Absolute end instant (exclusive).
    pub end: DateTime<Utc>,
    /// What the event represents.
    pub kind: EventKind,
    /// Short human-readable title.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Optional location (e.g. a meeting link or address).
    pub location: Option<String>,
    /// Backlink to the booking for `Meeting` events.
    pub booking_id: Option<BookingId>,
}

impl CalendarEvent {
    /// Creates one half of a confirmed session's event pair.
    #[must_use]
    pub fn meeting(
        owner_id: UserId,
        created_by: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: &str,
        booking_id: BookingId,
    ) -> Self {
        Self {
            id: EventId::new(),
            owner_id,
            created_by,
            start,
            end,
            kind: EventKind::Meeting,
            title: title.to_string(),
            description: "Confirmed session.".to_string(),
            location: None,
            booking_id: Some(booking_id),
        }
    }

    /// Returns `true` if the event belongs to the given user, either as
    /// owner or as creator.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.owner_id == user_id || self.created_by == user_id
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [
            EventKind::Custom,
            EventKind::Meeting,
            EventKind::Exercise,
            EventKind::Meditation,
        ] {
            let parsed = EventKind::from_str(kind.as_str());
            assert_eq!(parsed.ok(), Some(kind));
        }
        assert!(EventKind::from_str("YOGA").is_err());
    }

    #[test]
    fn meeting_constructor_links_booking() {
        let Some(start) = Utc.with_ymd_and_hms(2030, 6, 3, 9, 0, 0).single() else {
            panic!("valid timestamp");
        };
        let booking_id = BookingId::new();
        let owner = UserId::new();
        let event = CalendarEvent::meeting(
            owner,
            UserId::new(),
            start,
            start + chrono::Duration::hours(1),
            "Session with your psychologist",
            booking_id,
        );
        assert_eq!(event.kind, EventKind::Meeting);
        assert_eq!(event.booking_id, Some(booking_id));
        assert!(event.involves(owner));
        assert!(!event.involves(UserId::new()));
    }
}
