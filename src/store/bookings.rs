//! Concurrent booking storage with per-provider locking.
//!
//! [`BookingStore`] shards bookings by provider: each provider's bookings
//! live behind their own [`tokio::sync::RwLock`]. Every operation that
//! decides against the provider's confirmed set — the request-time conflict
//! check and the confirmation re-check — runs while holding that shard's
//! write guard, so check-then-commit is serialized per provider and two
//! overlapping requests (or two concurrent accepts) can never both pass.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{Booking, BookingId, BookingStatus, EventId, UserId};
use crate::error::GatewayError;

/// All bookings of a single provider. Access is guarded by the shard lock
/// handed out by [`BookingStore::provider_shard`].
#[derive(Debug, Default)]
pub struct ProviderBookings {
    bookings: HashMap<BookingId, Booking>,
}

impl ProviderBookings {
    /// Returns `true` if any `Confirmed` booking intersects the half-open
    /// window, ignoring `exclude` (the booking being confirmed).
    #[must_use]
    pub fn has_confirmed_overlap(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> bool {
        self.bookings.values().any(|b| {
            b.status == BookingStatus::Confirmed
                && Some(b.id) != exclude
                && b.overlaps_window(start, end)
        })
    }

    /// Looks up a booking in this shard.
    #[must_use]
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    /// Inserts a booking into this shard.
    pub fn insert(&mut self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    /// Marks a booking `Confirmed` and writes both event backlinks in the
    /// same mutation. Returns the updated booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if the booking is not in
    /// this shard.
    pub fn set_confirmed(
        &mut self,
        id: BookingId,
        event_id: EventId,
        provider_event_id: EventId,
    ) -> Result<Booking, GatewayError> {
        let booking = self
            .bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(id))?;
        booking.status = BookingStatus::Confirmed;
        booking.event_id = Some(event_id);
        booking.provider_event_id = Some(provider_event_id);
        Ok(booking.clone())
    }

    /// Marks a booking `Cancelled`. Returns the updated booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if the booking is not in
    /// this shard.
    pub fn set_cancelled(&mut self, id: BookingId) -> Result<Booking, GatewayError> {
        let booking = self
            .bookings
            .get_mut(&id)
            .ok_or(GatewayError::BookingNotFound(id))?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    /// Confirmed intervals in this shard, used by slot generation.
    #[must_use]
    pub fn confirmed_windows(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .map(|b| (b.start, b.end))
            .collect()
    }
}

/// Central store for all bookings, sharded by provider.
///
/// # Concurrency
///
/// - Operations on different providers are concurrent.
/// - Check-then-insert and check-then-confirm on one provider are
///   serialized behind the shard's write lock.
#[derive(Debug, Default)]
pub struct BookingStore {
    shards: RwLock<HashMap<UserId, Arc<RwLock<ProviderBookings>>>>,
    /// Maps each booking to its provider shard for id-based lookups.
    index: RwLock<HashMap<BookingId, UserId>>,
}

impl BookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shard for a provider, creating it on first use.
    pub async fn provider_shard(&self, provider_id: UserId) -> Arc<RwLock<ProviderBookings>> {
        {
            let shards = self.shards.read().await;
            if let Some(shard) = shards.get(&provider_id) {
                return Arc::clone(shard);
            }
        }
        let mut shards = self.shards.write().await;
        Arc::clone(shards.entry(provider_id).or_default())
    }

    /// Atomically checks the provider's confirmed set for a conflict and,
    /// if free, inserts a new `Pending` booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SlotConflict`] if a confirmed booking
    /// overlaps the requested window.
    pub async fn insert_pending_checked(
        &self,
        user_id: UserId,
        provider_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Booking, GatewayError> {
        let shard = self.provider_shard(provider_id).await;
        let mut guard = shard.write().await;
        if guard.has_confirmed_overlap(start, end, None) {
            return Err(GatewayError::SlotConflict);
        }
        let booking = Booking::pending(user_id, provider_id, start, end);
        guard.insert(booking.clone());
        drop(guard);

        self.index.write().await.insert(booking.id, provider_id);
        Ok(booking)
    }

    /// Looks up a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BookingNotFound`] if no booking with the
    /// given id exists.
    pub async fn get(&self, id: BookingId) -> Result<Booking, GatewayError> {
        let provider_id = {
            let index = self.index.read().await;
            *index.get(&id).ok_or(GatewayError::BookingNotFound(id))?
        };
        let shard = self.provider_shard(provider_id).await;
        let guard = shard.read().await;
        guard
            .get(id)
            .cloned()
            .ok_or(GatewayError::BookingNotFound(id))
    }

    /// Confirmed intervals for a provider, for the slot generator's
    /// conflict filter.
    pub async fn confirmed_windows(
        &self,
        provider_id: UserId,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let shard = self.provider_shard(provider_id).await;
        let guard = shard.read().await;
        guard.confirmed_windows()
    }

    /// All bookings made by a client, ordered by start time.
    pub async fn user_bookings(&self, user_id: UserId) -> Vec<Booking> {
        let shards: Vec<_> = {
            let map = self.shards.read().await;
            map.values().cloned().collect()
        };
        let mut result = Vec::new();
        for shard in shards {
            let guard = shard.read().await;
            result.extend(
                guard
                    .bookings
                    .values()
                    .filter(|b| b.user_id == user_id)
                    .cloned(),
            );
        }
        result.sort_by_key(|b| b.start);
        result
    }

    /// Pending bookings awaiting a provider's response, ordered by start.
    pub async fn pending_for_provider(&self, provider_id: UserId) -> Vec<Booking> {
        let shard = self.provider_shard(provider_id).await;
        let guard = shard.read().await;
        let mut result: Vec<Booking> = guard
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Pending)
            .cloned()
            .collect();
        result.sort_by_key(|b| b.start);
        result
    }
}
