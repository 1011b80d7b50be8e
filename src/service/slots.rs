//! Slot generation: materializes weekly templates into bookable intervals.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Duration, Utc};

use crate::domain::{Slot, UserId, interval};
use crate::store::{AvailabilityStore, BookingStore};

/// Generates concrete free slots from recurring availability templates.
///
/// Stateless except for its configured durations; reads templates and the
/// provider's confirmed bookings on every call so the output reflects the
/// store at the moment of the request.
#[derive(Debug, Clone)]
pub struct SlotService {
    availability: Arc<AvailabilityStore>,
    bookings: Arc<BookingStore>,
    session: Duration,
    buffer: Duration,
}

impl SlotService {
    /// Creates a new generator with the given session and buffer lengths.
    #[must_use]
    pub fn new(
        availability: Arc<AvailabilityStore>,
        bookings: Arc<BookingStore>,
        session: Duration,
        buffer: Duration,
    ) -> Self {
        Self {
            availability,
            bookings,
            session,
            buffer,
        }
    }

    /// Returns the free slots for a provider over the next `horizon_days`
    /// days, ordered by start time. An empty result is valid.
    pub async fn free_slots(&self, provider_id: UserId, horizon_days: u32) -> Vec<Slot> {
        self.free_slots_from(provider_id, horizon_days, Utc::now())
            .await
    }

    /// Slot generation anchored at an explicit `now`, for deterministic
    /// boundary checks.
    pub async fn free_slots_from(
        &self,
        provider_id: UserId,
        horizon_days: u32,
        now: DateTime<Utc>,
    ) -> Vec<Slot> {
        let confirmed = self.bookings.confirmed_windows(provider_id).await;
        let mut slots = Vec::new();

        for offset in 0..u64::from(horizon_days) {
            let Some(day) = now.checked_add_days(Days::new(offset)) else {
                break;
            };
            let date = day.date_naive();
            // 0 = Sunday, matching the availability convention.
            let day_of_week = date.weekday().num_days_from_sunday() as u8;

            let templates = self
                .availability
                .for_provider_day(provider_id, day_of_week)
                .await;

            for template in templates {
                let mut cursor = date.and_time(template.start).and_utc();
                let window_end = date.and_time(template.end).and_utc();

                // Carve session-long candidates; the last one may end
                // exactly at the window end.
                while cursor + self.session <= window_end {
                    let candidate_end = cursor + self.session;

                    let booked = confirmed
                        .iter()
                        .any(|&(start, end)| interval::overlaps(cursor, candidate_end, start, end));

                    if cursor >= now && !booked {
                        slots.push(Slot {
                            start: cursor,
                            end: candidate_end,
                        });
                    }

                    cursor = candidate_end + self.buffer;
                }
            }
        }

        slots.sort_by_key(|s| s.start);
        slots
    }
}
