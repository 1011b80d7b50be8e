//! Calendar event DTOs.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{EventKind, UserId};

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Calendar the event lands on.
    pub owner_id: UserId,
    /// Absolute start instant.
    pub start: DateTime<Utc>,
    /// Absolute end instant (exclusive).
    pub end: DateTime<Utc>,
    /// What the event represents; `MEETING` is rejected.
    pub kind: EventKind,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Optional location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for `PATCH /events/{id}`; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// New start instant.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// New end instant.
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New location; explicit `null` leaves it unchanged.
    #[serde(default)]
    pub location: Option<String>,
}
