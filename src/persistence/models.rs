//! Database models for the mirror tables.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BookingId, CalendarEvent, EventId, EventKind, UserId};
use crate::error::GatewayError;

/// A row from the `calendar_events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event id.
    pub id: Uuid,
    /// Calendar owner.
    pub owner_id: Uuid,
    /// Creating user.
    pub created_by: Uuid,
    /// Start instant.
    pub start_at: DateTime<Utc>,
    /// End instant (exclusive).
    pub end_at: DateTime<Utc>,
    /// Event kind discriminator (e.g. `"MEETING"`).
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional location.
    pub location: Option<String>,
    /// Backlink to the booking for meeting events.
    pub booking_id: Option<Uuid>,
}

impl EventRow {
    /// Converts the row back into a domain event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Persistence`] if the kind discriminator is
    /// not one this build understands.
    pub fn into_domain(self) -> Result<CalendarEvent, GatewayError> {
        Ok(CalendarEvent {
            id: EventId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            created_by: UserId::from_uuid(self.created_by),
            start: self.start_at,
            end: self.end_at,
            kind: EventKind::from_str(&self.kind)
                .map_err(|e| GatewayError::Persistence(e.to_string()))?,
            title: self.title,
            description: self.description,
            location: self.location,
            booking_id: self.booking_id.map(BookingId::from_uuid),
        })
    }
}
