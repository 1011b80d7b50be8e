//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a numeric code, a stable machine-readable kind string, and an
//! HTTP status, rendered as a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AvailabilityId, BookingId, EventId, NotificationId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "kind": "SLOT_CONFLICT",
///     "message": "requested slot overlaps a confirmed booking",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, stable kind, and human message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Stable machine-readable error kind (e.g. `"SLOT_CONFLICT"`).
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                |
/// |-----------|------------------|----------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request            |
/// | 2000–2099 | Not Found        | 404 Not Found              |
/// | 2100–2199 | State Conflict   | 409 Conflict               |
/// | 3000–3999 | Server           | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed before any state change.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Booking with the given ID was not found.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Calendar event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// Notification with the given ID was not found.
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),

    /// Availability rule with the given ID was not found.
    #[error("availability rule not found: {0}")]
    AvailabilityNotFound(AvailabilityId),

    /// The requested interval overlaps a confirmed booking.
    #[error("requested slot overlaps a confirmed booking; choose a different time")]
    SlotConflict,

    /// A weekly availability rule overlaps an existing rule.
    #[error("availability rule overlaps an existing rule for that day")]
    AvailabilityOverlap,

    /// A meeting invite was answered a second time.
    #[error("notification {0} has already been resolved")]
    NotificationAlreadyResolved(NotificationId),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::BookingNotFound(_) => 2001,
            Self::EventNotFound(_) => 2002,
            Self::NotificationNotFound(_) => 2003,
            Self::AvailabilityNotFound(_) => 2004,
            Self::SlotConflict => 2101,
            Self::AvailabilityOverlap => 2102,
            Self::NotificationAlreadyResolved(_) => 2103,
            Self::Persistence(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the stable machine-readable kind string for this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::BookingNotFound(_)
            | Self::EventNotFound(_)
            | Self::NotificationNotFound(_)
            | Self::AvailabilityNotFound(_) => "NOT_FOUND",
            Self::SlotConflict => "SLOT_CONFLICT",
            Self::AvailabilityOverlap => "AVAILABILITY_OVERLAP",
            Self::NotificationAlreadyResolved(_) => "NOTIFICATION_ALREADY_RESOLVED",
            Self::Persistence(_) => "PERSISTENCE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BookingNotFound(_)
            | Self::EventNotFound(_)
            | Self::NotificationNotFound(_)
            | Self::AvailabilityNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict
            | Self::AvailabilityOverlap
            | Self::NotificationAlreadyResolved(_) => StatusCode::CONFLICT,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn slot_conflict_maps_to_409() {
        let err = GatewayError::SlotConflict;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2101);
        assert_eq!(err.kind(), "SLOT_CONFLICT");
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let err = GatewayError::BookingNotFound(BookingId::new());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn already_resolved_maps_to_409() {
        let err = GatewayError::NotificationAlreadyResolved(NotificationId::new());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2103);
    }

    #[test]
    fn validation_maps_to_400() {
        let err = GatewayError::Validation("end must be after start".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "VALIDATION");
    }

    #[test]
    fn error_body_serializes_kind() {
        let err = GatewayError::AvailabilityOverlap;
        let body = ErrorBody {
            code: err.error_code(),
            kind: err.kind(),
            message: err.to_string(),
            details: None,
        };
        let json = serde_json::to_string(&body).unwrap_or_default();
        assert!(json.contains("AVAILABILITY_OVERLAP"));
        assert!(!json.contains("details"));
    }
}
