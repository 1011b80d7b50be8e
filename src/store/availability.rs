//! Storage for recurring weekly availability rules.

use std::collections::HashMap;

use chrono::NaiveTime;
use tokio::sync::RwLock;

use crate::domain::{AvailabilityId, UserId, WeeklyAvailability, interval};
use crate::error::GatewayError;

/// In-memory store of weekly availability rules.
///
/// Insert and update validate the half-open non-overlap invariant for the
/// rule's (provider, day) pair under the write lock, so two concurrent
/// creates cannot both slip past the check.
#[derive(Debug, Default)]
pub struct AvailabilityStore {
    rules: RwLock<HashMap<AvailabilityId, WeeklyAvailability>>,
}

impl AvailabilityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule after checking it against existing rules for the
    /// same provider and weekday.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AvailabilityOverlap`] if the new window
    /// intersects an existing one.
    pub async fn insert(&self, rule: WeeklyAvailability) -> Result<WeeklyAvailability, GatewayError> {
        let mut rules = self.rules.write().await;
        let conflicting = rules.values().any(|existing| {
            existing.provider_id == rule.provider_id
                && existing.day_of_week == rule.day_of_week
                && interval::overlaps(existing.start, existing.end, rule.start, rule.end)
        });
        if conflicting {
            return Err(GatewayError::AvailabilityOverlap);
        }
        rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    /// Rewrites a rule's window, re-validating range and overlap against
    /// the provider's other rules on the same day.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AvailabilityNotFound`] for an unknown id,
    /// [`GatewayError::Validation`] for an inverted window, or
    /// [`GatewayError::AvailabilityOverlap`] on intersection.
    pub async fn update(
        &self,
        id: AvailabilityId,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<WeeklyAvailability, GatewayError> {
        if start >= end {
            return Err(GatewayError::Validation(
                "availability start must be before end".to_string(),
            ));
        }
        let mut rules = self.rules.write().await;
        let current = rules
            .get(&id)
            .cloned()
            .ok_or(GatewayError::AvailabilityNotFound(id))?;
        let conflicting = rules.values().any(|existing| {
            existing.id != id
                && existing.provider_id == current.provider_id
                && existing.day_of_week == current.day_of_week
                && interval::overlaps(existing.start, existing.end, start, end)
        });
        if conflicting {
            return Err(GatewayError::AvailabilityOverlap);
        }
        let updated = rules
            .get_mut(&id)
            .ok_or(GatewayError::AvailabilityNotFound(id))?;
        updated.start = start;
        updated.end = end;
        Ok(updated.clone())
    }

    /// Removes a rule, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AvailabilityNotFound`] for an unknown id.
    pub async fn remove(&self, id: AvailabilityId) -> Result<WeeklyAvailability, GatewayError> {
        self.rules
            .write()
            .await
            .remove(&id)
            .ok_or(GatewayError::AvailabilityNotFound(id))
    }

    /// All rules for a provider, ordered by (day, start).
    pub async fn for_provider(&self, provider_id: UserId) -> Vec<WeeklyAvailability> {
        let rules = self.rules.read().await;
        let mut result: Vec<WeeklyAvailability> = rules
            .values()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        result.sort_by_key(|r| (r.day_of_week, r.start));
        result
    }

    /// Rules for a provider on one weekday, ordered by start.
    pub async fn for_provider_day(
        &self,
        provider_id: UserId,
        day_of_week: u8,
    ) -> Vec<WeeklyAvailability> {
        let rules = self.rules.read().await;
        let mut result: Vec<WeeklyAvailability> = rules
            .values()
            .filter(|r| r.provider_id == provider_id && r.day_of_week == day_of_week)
            .cloned()
            .collect();
        result.sort_by_key(|r| r.start);
        result
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::interval::parse_wall_clock;

    fn t(s: &str) -> NaiveTime {
        let Ok(t) = parse_wall_clock(s) else {
            panic!("valid time");
        };
        t
    }

    fn rule(provider: UserId, day: u8, start: &str, end: &str) -> WeeklyAvailability {
        let Ok(rule) = WeeklyAvailability::new(provider, day, t(start), t(end)) else {
            panic!("valid rule");
        };
        rule
    }

    #[tokio::test]
    async fn insert_and_list() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let inserted = store.insert(rule(provider, 1, "09:00", "11:00")).await;
        assert!(inserted.is_ok());
        assert_eq!(store.for_provider(provider).await.len(), 1);
    }

    #[tokio::test]
    async fn overlapping_rule_rejected() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let _ = store.insert(rule(provider, 1, "09:00", "11:00")).await;
        let overlap = store.insert(rule(provider, 1, "10:00", "12:00")).await;
        assert!(matches!(overlap, Err(GatewayError::AvailabilityOverlap)));
    }

    #[tokio::test]
    async fn adjacent_rule_allowed() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let _ = store.insert(rule(provider, 1, "09:00", "11:00")).await;
        // Half-open intervals: [09:00, 11:00) and [11:00, 13:00) are disjoint.
        let adjacent = store.insert(rule(provider, 1, "11:00", "13:00")).await;
        assert!(adjacent.is_ok());
    }

    #[tokio::test]
    async fn same_window_on_other_day_allowed() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let _ = store.insert(rule(provider, 1, "09:00", "11:00")).await;
        let other_day = store.insert(rule(provider, 2, "09:00", "11:00")).await;
        assert!(other_day.is_ok());
    }

    #[tokio::test]
    async fn other_provider_not_affected() {
        let store = AvailabilityStore::new();
        let _ = store.insert(rule(UserId::new(), 1, "09:00", "11:00")).await;
        let other = store.insert(rule(UserId::new(), 1, "09:00", "11:00")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn update_validates_overlap_excluding_self() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let Ok(first) = store.insert(rule(provider, 1, "09:00", "11:00")).await else {
            panic!("insert failed");
        };
        let _ = store.insert(rule(provider, 1, "13:00", "15:00")).await;

        // Growing within its own window is fine.
        let grown = store.update(first.id, t("09:00"), t("12:00")).await;
        assert!(grown.is_ok());

        // Growing into the second rule is not.
        let clash = store.update(first.id, t("09:00"), t("14:00")).await;
        assert!(matches!(clash, Err(GatewayError::AvailabilityOverlap)));
    }

    #[tokio::test]
    async fn remove_then_missing() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let Ok(inserted) = store.insert(rule(provider, 1, "09:00", "11:00")).await else {
            panic!("insert failed");
        };
        assert!(store.remove(inserted.id).await.is_ok());
        assert!(store.remove(inserted.id).await.is_err());
    }

    #[tokio::test]
    async fn listing_is_ordered() {
        let store = AvailabilityStore::new();
        let provider = UserId::new();
        let _ = store.insert(rule(provider, 3, "09:00", "10:00")).await;
        let _ = store.insert(rule(provider, 1, "14:00", "15:00")).await;
        let _ = store.insert(rule(provider, 1, "08:00", "09:00")).await;

        let all = store.for_provider(provider).await;
        let keys: Vec<(u8, NaiveTime)> = all.iter().map(|r| (r.day_of_week, r.start)).collect();
        assert_eq!(keys, vec![(1, t("08:00")), (1, t("14:00")), (3, t("09:00"))]);
    }
}
