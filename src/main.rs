//! booking-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, and
//! rebuilds the reminder timers from the durable event set.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use booking_gateway::api;
use booking_gateway::app_state::AppState;
use booking_gateway::config::GatewayConfig;
use booking_gateway::persistence::PostgresPersistence;
use booking_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting booking-gateway");

    // Connect the persistence mirror when enabled
    let persistence = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        let persistence = PostgresPersistence::new(pool);
        persistence.init_schema().await?;
        tracing::info!("persistence mirror connected");
        Some(Arc::new(persistence))
    } else {
        None
    };

    // Build application state
    let app_state = AppState::build(config.clone(), persistence.clone());

    // Crash recovery: reload future events, then rebuild reminder timers
    if let Some(persistence) = &persistence {
        let events = persistence.load_future_events(chrono::Utc::now()).await?;
        let loaded = events.len();
        for event in events {
            if let Err(e) = app_state.event_store.insert(event).await {
                tracing::warn!(error = %e, "skipping duplicate event from mirror");
            }
        }
        tracing::info!(loaded, "future events restored from mirror");
    }
    let armed = app_state.reminders.rearm_all().await;
    tracing::info!(armed, "reminder timers armed");

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(app_state.config.listen_addr).await?;
    tracing::info!(addr = %app_state.config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
