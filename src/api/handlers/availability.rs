//! Availability handlers: create, list, update, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AvailabilityDto, CreateAvailabilityRequest, UpdateAvailabilityRequest};
use crate::app_state::AppState;
use crate::domain::AvailabilityId;
use crate::domain::interval::parse_wall_clock;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /availability` — Add a weekly availability window.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed times or an overlapping window.
#[utoipa::path(
    post,
    path = "/api/v1/availability",
    tag = "Availability",
    summary = "Add a weekly availability window",
    description = "Registers a recurring window for one weekday. Windows for the same provider and day must not overlap; touching endpoints are allowed.",
    request_body = CreateAvailabilityRequest,
    responses(
        (status = 201, description = "Window created", body = AvailabilityDto),
        (status = 400, description = "Malformed window", body = ErrorResponse),
        (status = 409, description = "Overlaps an existing window", body = ErrorResponse),
    )
)]
pub async fn create_availability(
    State(state): State<AppState>,
    Json(req): Json<CreateAvailabilityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let start = parse_wall_clock(&req.start)?;
    let end = parse_wall_clock(&req.end)?;
    let rule = state
        .availability
        .add(req.provider_id, req.day_of_week, start, end)
        .await?;
    Ok((StatusCode::CREATED, Json(AvailabilityDto::from(rule))))
}

/// `GET /providers/:id/availability` — List a provider's windows.
#[utoipa::path(
    get,
    path = "/api/v1/providers/{id}/availability",
    tag = "Availability",
    summary = "List a provider's weekly windows",
    params(
        ("id" = uuid::Uuid, Path, description = "Provider UUID"),
    ),
    responses(
        (status = 200, description = "Windows ordered by day and start", body = Vec<AvailabilityDto>),
    )
)]
pub async fn list_availability(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let provider_id = crate::domain::UserId::from_uuid(id);
    let rules: Vec<AvailabilityDto> = state
        .availability
        .for_provider(provider_id)
        .await
        .into_iter()
        .map(AvailabilityDto::from)
        .collect();
    Json(rules)
}

/// `PATCH /availability/:id` — Rewrite a window's times.
///
/// # Errors
///
/// Returns [`GatewayError`] on unknown id, malformed times, or overlap.
#[utoipa::path(
    patch,
    path = "/api/v1/availability/{id}",
    tag = "Availability",
    summary = "Update a window's times",
    params(
        ("id" = uuid::Uuid, Path, description = "Availability rule UUID"),
    ),
    request_body = UpdateAvailabilityRequest,
    responses(
        (status = 200, description = "Window updated", body = AvailabilityDto),
        (status = 404, description = "Rule not found", body = ErrorResponse),
        (status = 409, description = "Overlaps another window", body = ErrorResponse),
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let start = parse_wall_clock(&req.start)?;
    let end = parse_wall_clock(&req.end)?;
    let rule = state
        .availability
        .update(AvailabilityId::from_uuid(id), start, end)
        .await?;
    Ok(Json(AvailabilityDto::from(rule)))
}

/// `DELETE /availability/:id` — Remove a window.
///
/// # Errors
///
/// Returns [`GatewayError::AvailabilityNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/availability/{id}",
    tag = "Availability",
    summary = "Remove a window",
    description = "Deletes the window and pushes an `availability_removed` hint to the provider's room. Confirmed bookings are not affected.",
    params(
        ("id" = uuid::Uuid, Path, description = "Availability rule UUID"),
    ),
    responses(
        (status = 200, description = "Window removed", body = AvailabilityDto),
        (status = 404, description = "Rule not found", body = ErrorResponse),
    )
)]
pub async fn delete_availability(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let rule = state
        .availability
        .remove(AvailabilityId::from_uuid(id))
        .await?;
    Ok(Json(AvailabilityDto::from(rule)))
}

/// Availability routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/availability", post(create_availability))
        .route(
            "/availability/{id}",
            axum::routing::patch(update_availability).delete(delete_availability),
        )
        .route("/providers/{id}/availability", get(list_availability))
}
