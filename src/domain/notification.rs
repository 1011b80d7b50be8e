//! Notification records delivered over the push channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, EventId, NotificationId, UserId};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A client requested a session; sent to the provider, answerable.
    MeetingInvite,
    /// A calendar event was created for the recipient.
    EventCreated,
    /// A calendar event or booking changed state.
    EventUpdated,
    /// A reminder that an event starts soon.
    EventReminder,
}

impl NotificationKind {
    /// Stable string form used by the persistence mirror.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MeetingInvite => "MEETING_INVITE",
            Self::EventCreated => "EVENT_CREATED",
            Self::EventUpdated => "EVENT_UPDATED",
            Self::EventReminder => "EVENT_REMINDER",
        }
    }
}

/// The provider's answer to a meeting invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// No answer recorded yet.
    Pending,
    /// The provider accepted the booking.
    Accepted,
    /// The provider denied the booking.
    Denied,
}

impl ResponseStatus {
    /// Stable string form used by the persistence mirror.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Denied => "DENIED",
        }
    }
}

/// A persisted notification for one recipient.
///
/// `response` is `Some(Pending)` only on meeting invites; the confirmation
/// workflow writes it exactly once when the provider answers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// The recipient.
    pub user_id: UserId,
    /// Human-readable message.
    pub message: String,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// Creation timestamp; newest-first ordering key.
    pub created_at: DateTime<Utc>,
    /// Related calendar event, if any.
    pub event_id: Option<EventId>,
    /// Related booking, if any (set on meeting invites).
    pub booking_id: Option<BookingId>,
    /// Invite response state; `None` for non-answerable notifications.
    pub response: Option<ResponseStatus>,
}
