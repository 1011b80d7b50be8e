//! Half-open interval arithmetic and wall-clock time parsing.
//!
//! Every overlap decision in the gateway — availability rules, booking
//! conflicts, slot generation — uses the same half-open test: `[a, b)` and
//! `[c, d)` overlap iff `a < d && c < b`. Touching endpoints do not overlap.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Returns `true` if the half-open intervals `[a_start, a_end)` and
/// `[b_start, b_end)` intersect.
#[must_use]
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// A concrete bookable interval produced by slot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Slot {
    /// Inclusive start of the slot.
    pub start: DateTime<Utc>,
    /// Exclusive end of the slot.
    pub end: DateTime<Utc>,
}

/// Parses a `"HH:MM"` wall-clock string into a [`NaiveTime`].
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] if the string is not a valid
/// 24-hour `HH:MM` time.
pub fn parse_wall_clock(value: &str) -> Result<NaiveTime, GatewayError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| GatewayError::Validation(format!("invalid wall-clock time: {value:?}")))
}

/// Formats a [`NaiveTime`] back to the `"HH:MM"` transport form.
#[must_use]
pub fn format_wall_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        let Some(dt) = Utc.with_ymd_and_hms(2030, 6, 3, hour, minute, 0).single() else {
            panic!("valid timestamp");
        };
        dt
    }

    #[test]
    fn intersecting_intervals_overlap() {
        assert!(overlaps(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
        assert!(overlaps(at(9, 30), at(10, 30), at(9, 0), at(10, 0)));
    }

    #[test]
    fn contained_interval_overlaps() {
        assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
        assert!(overlaps(at(10, 0), at(11, 0), at(9, 0), at(12, 0)));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        // Half-open: [9:00, 10:00) and [10:00, 11:00) share no instant.
        assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
        assert!(!overlaps(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(at(9, 0), at(10, 0), at(11, 0), at(12, 0)));
    }

    #[test]
    fn works_on_wall_clock_times() {
        let Ok(a) = parse_wall_clock("09:00") else {
            panic!("parse failed");
        };
        let Ok(b) = parse_wall_clock("10:00") else {
            panic!("parse failed");
        };
        let Ok(c) = parse_wall_clock("09:30") else {
            panic!("parse failed");
        };
        assert!(overlaps(a, b, c, b));
        assert!(!overlaps(a, c, c, b));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_wall_clock("25:00").is_err());
        assert!(parse_wall_clock("9am").is_err());
        assert!(parse_wall_clock("").is_err());
    }

    #[test]
    fn format_round_trips() {
        let Ok(t) = parse_wall_clock("09:05") else {
            panic!("parse failed");
        };
        assert_eq!(format_wall_clock(t), "09:05");
    }
}
