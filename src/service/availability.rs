//! Weekly availability management.

use std::sync::Arc;

use chrono::NaiveTime;

use crate::domain::{AvailabilityId, UserId, WeeklyAvailability};
use crate::error::GatewayError;
use crate::service::notifications::NotificationService;
use crate::store::AvailabilityStore;

/// Manages providers' recurring weekly windows.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    store: Arc<AvailabilityStore>,
    notifications: NotificationService,
}

impl AvailabilityService {
    /// Creates a new availability service.
    #[must_use]
    pub fn new(store: Arc<AvailabilityStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Adds a weekly window for a provider.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for a malformed window.
    /// - [`GatewayError::AvailabilityOverlap`] if it intersects an
    ///   existing window on the same day.
    pub async fn add(
        &self,
        provider_id: UserId,
        day_of_week: u8,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<WeeklyAvailability, GatewayError> {
        let rule = WeeklyAvailability::new(provider_id, day_of_week, start, end)?;
        let rule = self.store.insert(rule).await?;
        tracing::info!(
            availability_id = %rule.id,
            provider_id = %provider_id,
            day_of_week,
            "availability added"
        );
        Ok(rule)
    }

    /// Rewrites an existing window's times; the weekday stays fixed.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::AvailabilityNotFound`] for an unknown id.
    /// - [`GatewayError::Validation`] for a malformed window.
    /// - [`GatewayError::AvailabilityOverlap`] if the new window
    ///   intersects another window on the same day.
    pub async fn update(
        &self,
        id: AvailabilityId,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<WeeklyAvailability, GatewayError> {
        self.store.update(id, start, end).await
    }

    /// Removes a window and pushes an `availability_removed` hint to the
    /// provider's room so open calendars refresh.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AvailabilityNotFound`] for an unknown id.
    pub async fn remove(&self, id: AvailabilityId) -> Result<WeeklyAvailability, GatewayError> {
        let removed = self.store.remove(id).await?;
        self.notifications
            .push_availability_removed(removed.provider_id, removed.id);
        tracing::info!(availability_id = %removed.id, "availability removed");
        Ok(removed)
    }

    /// A provider's windows, ordered by day then start time.
    pub async fn for_provider(&self, provider_id: UserId) -> Vec<WeeklyAvailability> {
        self.store.for_provider(provider_id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventBus, PushEvent};
    use crate::domain::interval::parse_wall_clock;
    use crate::store::NotificationStore;

    fn t(s: &str) -> NaiveTime {
        let Ok(t) = parse_wall_clock(s) else {
            panic!("valid time");
        };
        t
    }

    fn make_service() -> (AvailabilityService, EventBus) {
        let bus = EventBus::new(100);
        let notifications =
            NotificationService::new(Arc::new(NotificationStore::new()), bus.clone(), None);
        let service = AvailabilityService::new(Arc::new(AvailabilityStore::new()), notifications);
        (service, bus)
    }

    #[tokio::test]
    async fn add_then_overlap_is_rejected() {
        let (service, _) = make_service();
        let provider = UserId::new();
        assert!(service.add(provider, 1, t("09:00"), t("12:00")).await.is_ok());
        let overlap = service.add(provider, 1, t("11:00"), t("13:00")).await;
        assert!(matches!(overlap, Err(GatewayError::AvailabilityOverlap)));
    }

    #[tokio::test]
    async fn remove_pushes_a_refresh_hint() {
        let (service, bus) = make_service();
        let provider = UserId::new();
        let Ok(rule) = service.add(provider, 2, t("09:00"), t("12:00")).await else {
            panic!("add failed");
        };
        let mut rx = bus.subscribe();

        assert!(service.remove(rule.id).await.is_ok());

        let Ok(PushEvent::AvailabilityRemoved {
            user_id,
            availability_id,
            ..
        }) = rx.recv().await
        else {
            panic!("expected availability_removed push");
        };
        assert_eq!(user_id, provider);
        assert_eq!(availability_id, rule.id);

        assert!(service.for_provider(provider).await.is_empty());
    }

    #[tokio::test]
    async fn update_moves_the_window() {
        let (service, _) = make_service();
        let provider = UserId::new();
        let Ok(rule) = service.add(provider, 2, t("09:00"), t("12:00")).await else {
            panic!("add failed");
        };
        let updated = service.update(rule.id, t("10:00"), t("11:00")).await;
        let Ok(updated) = updated else {
            panic!("update failed");
        };
        assert_eq!(updated.start, t("10:00"));
        assert_eq!(updated.day_of_week, 2);
    }
}
