//! Slot and booking DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Booking, Notification, Slot, UserId};

/// Query parameters for `GET /providers/{id}/slots`.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct SlotsQuery {
    /// Horizon in days; defaults to the configured value.
    pub days_ahead: Option<u32>,
}

/// Response body for `GET /providers/{id}/slots`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotsResponse {
    /// The provider the slots belong to.
    pub provider_id: UserId,
    /// Free slots, ordered by start.
    pub slots: Vec<Slot>,
}

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// The client requesting the session.
    pub user_id: UserId,
    /// The provider being booked.
    pub provider_id: UserId,
    /// Absolute session start.
    pub start: DateTime<Utc>,
    /// Absolute session end (exclusive).
    pub end: DateTime<Utc>,
}

/// Response body for `POST /bookings` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingRequestResponse {
    /// The newly recorded `PENDING` booking.
    pub booking: Booking,
    /// The meeting invite delivered to the provider.
    pub invite: Notification,
}
