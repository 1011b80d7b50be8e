//! Slot and booking handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BookingRequestResponse, CreateBookingRequest, SlotsQuery, SlotsResponse, UserQuery,
};
use crate::app_state::AppState;
use crate::domain::{Booking, UserId};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /providers/:id/slots` — Free slots over the coming days.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/slots",
    tag = "Bookings",
    summary = "List a provider's free slots",
    description = "Materializes the provider's weekly windows into concrete session-length slots, skipping anything in the past or overlapping a confirmed booking.",
    params(
        ("id" = uuid::Uuid, Path, description = "Provider UUID"),
        SlotsQuery,
    ),
    responses(
        (status = 200, description = "Free slots ordered by start", body = SlotsResponse),
    )
)]
pub async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<SlotsQuery>,
) -> impl IntoResponse {
    let provider_id = UserId::from_uuid(id);
    let horizon = query
        .days_ahead
        .unwrap_or(state.config.default_horizon_days);
    let slots = state.slots.free_slots(provider_id, horizon).await;
    Json(SlotsResponse { provider_id, slots })
}

/// `POST /bookings` — Request a session.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure or a slot conflict.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Request a session with a provider",
    description = "Records a PENDING booking and delivers a meeting invite to the provider. The slot is only taken once the provider accepts.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking recorded, invite sent", body = BookingRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Window overlaps a confirmed booking", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let (booking, invite) = state
        .bookings
        .request_booking(req.user_id, req.provider_id, req.start, req.end)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingRequestResponse { booking, invite }),
    ))
}

/// `GET /bookings` — A client's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "List a client's bookings",
    params(UserQuery),
    responses(
        (status = 200, description = "Bookings ordered by start", body = Vec<Booking>),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(state.bookings.user_bookings(query.user_id).await)
}

/// `GET /providers/:id/bookings/pending` — Invites awaiting an answer.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/bookings/pending",
    tag = "Bookings",
    summary = "List a provider's pending bookings",
    params(
        ("id" = uuid::Uuid, Path, description = "Provider UUID"),
    ),
    responses(
        (status = 200, description = "Pending bookings ordered by start", body = Vec<Booking>),
    )
)]
pub async fn list_pending_bookings(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    Json(
        state
            .bookings
            .pending_for_provider(UserId::from_uuid(id))
            .await,
    )
}

/// Slot and booking routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/providers/{id}/slots", get(list_slots))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/providers/{id}/bookings/pending", get(list_pending_bookings))
}
