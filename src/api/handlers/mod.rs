//! REST endpoint handlers organized by resource.

pub mod availability;
pub mod booking;
pub mod event;
pub mod notification;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(availability::routes())
        .merge(booking::routes())
        .merge(event::routes())
        .merge(notification::routes())
}
