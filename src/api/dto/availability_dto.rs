//! Availability DTOs.
//!
//! Times cross the wire as `"HH:MM"` wall-clock strings, matching how
//! providers think about their week.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::interval::format_wall_clock;
use crate::domain::{AvailabilityId, UserId, WeeklyAvailability};

/// Request body for `POST /availability`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAvailabilityRequest {
    /// The provider who owns the window.
    pub provider_id: UserId,
    /// Day of week, `0` (Sunday) through `6` (Saturday).
    pub day_of_week: u8,
    /// Wall-clock start, `"HH:MM"`.
    pub start: String,
    /// Wall-clock end, `"HH:MM"` (exclusive).
    pub end: String,
}

/// Request body for `PATCH /availability/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailabilityRequest {
    /// New wall-clock start, `"HH:MM"`.
    pub start: String,
    /// New wall-clock end, `"HH:MM"` (exclusive).
    pub end: String,
}

/// Availability rule as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    /// Rule identifier.
    pub id: AvailabilityId,
    /// Owning provider.
    pub provider_id: UserId,
    /// Day of week, `0` (Sunday) through `6` (Saturday).
    pub day_of_week: u8,
    /// Wall-clock start, `"HH:MM"`.
    pub start: String,
    /// Wall-clock end, `"HH:MM"` (exclusive).
    pub end: String,
}

impl From<WeeklyAvailability> for AvailabilityDto {
    fn from(rule: WeeklyAvailability) -> Self {
        Self {
            id: rule.id,
            provider_id: rule.provider_id,
            day_of_week: rule.day_of_week,
            start: format_wall_clock(rule.start),
            end: format_wall_clock(rule.end),
        }
    }
}
