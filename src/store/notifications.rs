//! Storage for notification records.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{Notification, NotificationId, ResponseStatus, UserId};
use crate::error::GatewayError;

/// In-memory store of notifications.
///
/// [`NotificationStore::resolve`] enforces the exactly-once invite
/// response: the transition away from `Pending` is a compare-and-set under
/// the write lock, so a second answer always fails.
#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl NotificationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a notification.
    pub async fn insert(&self, notification: Notification) {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification);
    }

    /// Looks up a notification by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotificationNotFound`] for an unknown id.
    pub async fn get(&self, id: NotificationId) -> Result<Notification, GatewayError> {
        self.notifications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotificationNotFound(id))
    }

    /// Records the provider's answer on an invite, exactly once.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::NotificationNotFound`] for an unknown id.
    /// - [`GatewayError::Validation`] if the notification is not an
    ///   answerable invite.
    /// - [`GatewayError::NotificationAlreadyResolved`] if an answer was
    ///   already recorded.
    pub async fn resolve(
        &self,
        id: NotificationId,
        response: ResponseStatus,
    ) -> Result<Notification, GatewayError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .get_mut(&id)
            .ok_or(GatewayError::NotificationNotFound(id))?;
        match notification.response {
            None => Err(GatewayError::Validation(
                "notification is not an answerable invite".to_string(),
            )),
            Some(ResponseStatus::Pending) => {
                notification.response = Some(response);
                Ok(notification.clone())
            }
            Some(_) => Err(GatewayError::NotificationAlreadyResolved(id)),
        }
    }

    /// All notifications for a user, newest first.
    pub async fn for_user(&self, user_id: UserId) -> Vec<Notification> {
        let notifications = self.notifications.read().await;
        let mut result: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// Unread notifications for a user, newest first.
    pub async fn unread_for_user(&self, user_id: UserId) -> Vec<Notification> {
        let notifications = self.notifications.read().await;
        let mut result: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// Marks one notification read, scoped to its owner. Idempotent;
    /// returns `true` if the notification exists and belongs to the user.
    pub async fn mark_read(&self, id: NotificationId, user_id: UserId) -> bool {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&id) {
            Some(n) if n.user_id == user_id => {
                n.is_read = true;
                true
            }
            _ => false,
        }
    }

    /// Marks all of a user's notifications read. Idempotent; returns the
    /// number of rows that changed.
    pub async fn mark_all_read(&self, user_id: UserId) -> usize {
        let mut notifications = self.notifications.write().await;
        let mut changed = 0;
        for n in notifications.values_mut() {
            if n.user_id == user_id && !n.is_read {
                n.is_read = true;
                changed += 1;
            }
        }
        changed
    }
}
