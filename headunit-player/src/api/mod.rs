//! HTTP transport for the player service
//!
//! Mounts the player session and the mock device managers on an axum
//! router. Control calls arrive on arbitrary server worker threads;
//! serialization happens inside the session, not here.

pub mod devices;
pub mod handlers;
pub mod sse;

use crate::devices::DeviceHub;
use crate::session::PlayerSession;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppContext {
    /// The playback service object
    pub session: Arc<PlayerSession>,
    /// Mock device managers
    pub devices: Arc<DeviceHub>,
    /// Server port
    pub port: u16,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Playback control endpoints
                .route("/playback/play", post(handlers::play))
                .route("/playback/file", post(handlers::play_file))
                .route("/playback/pause", post(handlers::pause))
                .route("/playback/stop", post(handlers::stop))
                .route("/playback/seek", post(handlers::seek))
                .route("/playback/position", get(handlers::get_position))
                .route("/playback/state", get(handlers::get_state))
                // SSE events
                .route("/events", get(sse::event_stream))
                // Mock device managers
                .route(
                    "/connectivity/wifi",
                    get(devices::get_wifi).post(devices::set_wifi),
                )
                .route(
                    "/connectivity/bluetooth",
                    get(devices::get_bluetooth).post(devices::set_bluetooth),
                )
                .route("/connectivity/nfc", get(devices::get_nfc))
                .route(
                    "/connectivity/hvac/:zone",
                    get(devices::get_hvac).post(devices::set_hvac),
                )
                .route("/connectivity/window", post(devices::set_window)),
        )
        .with_state(ctx)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "headunit-player",
        "version": env!("CARGO_PKG_VERSION"),
        "port": ctx.port,
    }))
}
