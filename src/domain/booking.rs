//! Booking records and their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, EventId, UserId, interval};

/// Lifecycle state of a booking.
///
/// A booking is created `Pending` and transitions exactly once, to either
/// `Confirmed` or `Cancelled`, driven by the confirmation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Requested by a client, awaiting the provider's response.
    Pending,
    /// Accepted by the provider; paired calendar events exist.
    Confirmed,
    /// Denied by the provider; terminal.
    Cancelled,
}

/// A client's request for a session with a provider.
///
/// The event-id backlinks are written once, atomically with the
/// `Confirmed` transition, and never mutated afterwards.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// The client who requested the session.
    pub user_id: UserId,
    /// The provider whose time is being booked.
    pub provider_id: UserId,
    /// Absolute session start.
    pub start: DateTime<Utc>,
    /// Absolute session end (exclusive).
    pub end: DateTime<Utc>,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Client-side meeting event, set on confirmation.
    pub event_id: Option<EventId>,
    /// Provider-side meeting event, set on confirmation.
    pub provider_event_id: Option<EventId>,
    /// When the booking request was recorded.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new `Pending` booking.
    #[must_use]
    pub fn pending(
        user_id: UserId,
        provider_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            provider_id,
            start,
            end,
            status: BookingStatus::Pending,
            event_id: None,
            provider_event_id: None,
            created_at: Utc::now(),
        }
    }

    /// Returns `true` if this booking's interval intersects the given
    /// half-open window.
    #[must_use]
    pub fn overlaps_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        interval::overlaps(self.start, self.end, start, end)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        let Some(dt) = Utc.with_ymd_and_hms(2030, 6, 3, hour, 0, 0).single() else {
            panic!("valid timestamp");
        };
        dt
    }

    #[test]
    fn new_booking_is_pending_and_unlinked() {
        let booking = Booking::pending(UserId::new(), UserId::new(), at(9), at(10));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert!(booking.event_id.is_none());
        assert!(booking.provider_event_id.is_none());
    }

    #[test]
    fn overlap_uses_half_open_intervals() {
        let booking = Booking::pending(UserId::new(), UserId::new(), at(9), at(10));
        assert!(booking.overlaps_window(at(9), at(10)));
        assert!(!booking.overlaps_window(at(10), at(11)));
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap_or_default();
        assert_eq!(json, "\"CONFIRMED\"");
    }
}
