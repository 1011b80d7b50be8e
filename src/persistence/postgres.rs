//! PostgreSQL implementation of the persistence mirror.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::EventRow;
use crate::domain::{CalendarEvent, EventId, Notification};
use crate::error::GatewayError;

/// PostgreSQL-backed mirror using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new mirror with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the mirror tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn init_schema(&self) -> Result<(), GatewayError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS calendar_events (\
                 id UUID PRIMARY KEY, \
                 owner_id UUID NOT NULL, \
                 created_by UUID NOT NULL, \
                 start_at TIMESTAMPTZ NOT NULL, \
                 end_at TIMESTAMPTZ NOT NULL, \
                 kind TEXT NOT NULL, \
                 title TEXT NOT NULL, \
                 description TEXT NOT NULL, \
                 location TEXT, \
                 booking_id UUID\
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notifications (\
                 id UUID PRIMARY KEY, \
                 user_id UUID NOT NULL, \
                 message TEXT NOT NULL, \
                 kind TEXT NOT NULL, \
                 is_read BOOLEAN NOT NULL DEFAULT FALSE, \
                 created_at TIMESTAMPTZ NOT NULL, \
                 event_id UUID, \
                 booking_id UUID, \
                 response TEXT\
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(())
    }

    /// Writes a calendar event through to the mirror, upserting on id.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn save_event(&self, event: &CalendarEvent) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO calendar_events \
                 (id, owner_id, created_by, start_at, end_at, kind, title, description, location, booking_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                 start_at = EXCLUDED.start_at, \
                 end_at = EXCLUDED.end_at, \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 location = EXCLUDED.location",
        )
        .bind(*event.id.as_uuid())
        .bind(*event.owner_id.as_uuid())
        .bind(*event.created_by.as_uuid())
        .bind(event.start)
        .bind(event.end)
        .bind(event.kind.as_str())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.location.as_deref())
        .bind(event.booking_id.map(|id| *id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(())
    }

    /// Deletes a calendar event from the mirror. Missing rows are not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn delete_event(&self, id: EventId) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM calendar_events WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::Persistence(e.to_string()))?;
        Ok(())
    }

    /// Writes a notification through to the mirror, upserting on id so
    /// read flags and invite answers overwrite earlier rows.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure.
    pub async fn save_notification(&self, notification: &Notification) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO notifications \
                 (id, user_id, message, kind, is_read, created_at, event_id, booking_id, response) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
                 is_read = EXCLUDED.is_read, \
                 response = EXCLUDED.response",
        )
        .bind(*notification.id.as_uuid())
        .bind(*notification.user_id.as_uuid())
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.is_read)
        .bind(notification.created_at)
        .bind(notification.event_id.map(|id| *id.as_uuid()))
        .bind(notification.booking_id.map(|id| *id.as_uuid()))
        .bind(notification.response.map(|r| r.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        Ok(())
    }

    /// Loads every event starting after `now`, ordered by start.
    ///
    /// Called once at startup to refill the in-memory store before the
    /// reminder timers are rebuilt.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::Persistence`] on database failure or an
    /// unknown kind discriminator.
    pub async fn load_future_events(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, GatewayError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, owner_id, created_by, start_at, end_at, kind, title, description, location, booking_id \
             FROM calendar_events WHERE start_at > $1 ORDER BY start_at ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::Persistence(e.to_string()))?;

        rows.into_iter().map(EventRow::into_domain).collect()
    }
}
