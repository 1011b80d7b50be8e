//! Notification inbox and invite response handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    MarkAllReadRequest, ReadAllResponse, ReadResponse, RespondRequest, UserQuery,
};
use crate::app_state::AppState;
use crate::domain::{Booking, Notification, NotificationId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /notifications` — A user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "List a user's notifications",
    params(UserQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = Vec<Notification>),
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(state.notifications.for_user(query.user_id).await)
}

/// `GET /notifications/unread` — Only the unread ones.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread",
    tag = "Notifications",
    summary = "List a user's unread notifications",
    params(UserQuery),
    responses(
        (status = 200, description = "Unread notifications, newest first", body = Vec<Notification>),
    )
)]
pub async fn list_unread(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(state.notifications.unread_for_user(query.user_id).await)
}

/// `PATCH /notifications/:id/response` — Answer a meeting invite.
///
/// # Errors
///
/// Returns [`GatewayError`] if the invite is unknown, already answered,
/// or accepting would conflict with a confirmed booking.
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/response",
    tag = "Notifications",
    summary = "Answer a meeting invite",
    description = "Accepting confirms the booking and creates the paired calendar events atomically; denying cancels it. Each invite can be answered exactly once.",
    params(
        ("id" = uuid::Uuid, Path, description = "Notification UUID"),
    ),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Booking after the transition", body = Booking),
        (status = 400, description = "Not an answerable invite", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse),
        (status = 409, description = "Already answered, or the slot was taken", body = ErrorResponse),
    )
)]
pub async fn respond(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RespondRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let booking = state
        .confirmations
        .respond(NotificationId::from_uuid(id), req.response)
        .await?;
    Ok(Json(booking))
}

/// `PATCH /notifications/:id/read` — Mark one notification read.
#[utoipa::path(
    patch,
    path = "/api/v1/notifications/{id}/read",
    tag = "Notifications",
    summary = "Mark one notification read",
    params(
        ("id" = uuid::Uuid, Path, description = "Notification UUID"),
        UserQuery,
    ),
    responses(
        (status = 200, description = "Idempotent result", body = ReadResponse),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    let updated = state
        .notifications
        .mark_read(NotificationId::from_uuid(id), query.user_id)
        .await;
    Json(ReadResponse { updated })
}

/// `POST /notifications/read-all` — Mark a whole inbox read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    tag = "Notifications",
    summary = "Mark all of a user's notifications read",
    request_body = MarkAllReadRequest,
    responses(
        (status = 200, description = "Number of rows changed", body = ReadAllResponse),
    )
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Json(req): Json<MarkAllReadRequest>,
) -> impl IntoResponse {
    let updated = state.notifications.mark_all_read(req.user_id).await;
    Json(ReadAllResponse { updated })
}

/// Notification routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread", get(list_unread))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/{id}/response", axum::routing::patch(respond))
        .route("/notifications/{id}/read", axum::routing::patch(mark_read))
}
