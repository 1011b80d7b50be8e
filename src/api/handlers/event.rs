//! Calendar event handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateEventRequest, UpdateEventRequest, UserQuery};
use crate::app_state::AppState;
use crate::domain::{CalendarEvent, EventId};
use crate::error::{ErrorResponse, GatewayError};
use crate::service::{EventPatch, NewEvent};

/// `POST /events` — Create a calendar event.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create a calendar event",
    description = "Creates a custom, exercise or meditation event on the owner's calendar and arms its reminder. Meeting events come from the booking workflow only.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = CalendarEvent),
        (status = 400, description = "Invalid event", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .events
        .create(NewEvent {
            owner_id: req.owner_id,
            start: req.start,
            end: req.end,
            kind: req.kind,
            title: req.title,
            description: req.description,
            location: req.location,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `PATCH /events/:id` — Update an event.
///
/// # Errors
///
/// Returns [`GatewayError`] on unknown id or a time edit on a meeting.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies a partial update. Moving the start re-arms the reminder. Meeting times cannot be edited here.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = CalendarEvent),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .events
        .update(
            EventId::from_uuid(id),
            EventPatch {
                start: req.start,
                end: req.end,
                title: req.title,
                description: req.description,
                location: req.location.map(Some),
            },
        )
        .await?;
    Ok(Json(event))
}

/// `DELETE /events/:id` — Delete an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    description = "Disarms the event's reminder and removes it from the calendar.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = CalendarEvent),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state.events.delete(EventId::from_uuid(id)).await?;
    Ok(Json(event))
}

/// `GET /events/upcoming` — A user's upcoming events.
#[utoipa::path(
    get,
    path = "/api/v1/events/upcoming",
    tag = "Events",
    summary = "List a user's upcoming events",
    params(UserQuery),
    responses(
        (status = 200, description = "Future events ordered by start", body = Vec<CalendarEvent>),
    )
)]
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> impl IntoResponse {
    Json(state.events.upcoming_for_user(query.user_id).await)
}

/// Event routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/upcoming", get(upcoming_events))
        .route(
            "/events/{id}",
            axum::routing::patch(update_event).delete(delete_event),
        )
}
