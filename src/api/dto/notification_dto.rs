//! Notification DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ResponseStatus, UserId};

/// Request body for `PATCH /notifications/{id}/response`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RespondRequest {
    /// The provider's answer; `ACCEPTED` or `DENIED`.
    pub response: ResponseStatus,
}

/// Request body for `POST /notifications/read-all`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAllReadRequest {
    /// Whose inbox to mark read.
    pub user_id: UserId,
}

/// Response body for `PATCH /notifications/{id}/read`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadResponse {
    /// Whether the notification existed and belonged to the user.
    pub updated: bool,
}

/// Response body for `POST /notifications/read-all`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadAllResponse {
    /// Number of notifications that changed state.
    pub updated: usize,
}
