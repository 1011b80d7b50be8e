//! Recurring weekly availability templates owned by providers.

use chrono::NaiveTime;
use serde::Serialize;
use utoipa::ToSchema;

use super::{AvailabilityId, UserId};
use crate::error::GatewayError;

/// One recurring weekly availability window for a provider.
///
/// `day_of_week` follows the calendar convention: `0` is Sunday,
/// `6` is Saturday. Times are wall-clock `HH:MM` values materialized onto
/// concrete days by the slot generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WeeklyAvailability {
    /// Rule identifier.
    pub id: AvailabilityId,
    /// The provider who owns this window.
    pub provider_id: UserId,
    /// Day of week, `0` (Sunday) through `6` (Saturday).
    pub day_of_week: u8,
    /// Wall-clock start of the window.
    pub start: NaiveTime,
    /// Wall-clock end of the window (exclusive).
    pub end: NaiveTime,
}

impl WeeklyAvailability {
    /// Creates a validated availability rule.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if `day_of_week` is out of
    /// range or `start >= end`.
    pub fn new(
        provider_id: UserId,
        day_of_week: u8,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, GatewayError> {
        if day_of_week > 6 {
            return Err(GatewayError::Validation(format!(
                "day_of_week must be 0..=6, got {day_of_week}"
            )));
        }
        if start >= end {
            return Err(GatewayError::Validation(
                "availability start must be before end".to_string(),
            ));
        }
        Ok(Self {
            id: AvailabilityId::new(),
            provider_id,
            day_of_week,
            start,
            end,
        })
    }
}
