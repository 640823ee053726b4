//! HTTP request handlers for playback control
//!
//! Control operations acknowledge with 200/202 regardless of player-level
//! no-op outcomes; asynchronous results (prepare success or failure) are
//! delivered on the event stream, and clients poll the position endpoint
//! for progress.

use crate::api::AppContext;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use tracing::error;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    pub position_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub position_ms: u64,
    pub duration_ms: u64,
    pub state: String,
    pub playing: bool,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: String,
    pub playing: bool,
    pub subscriber_count: usize,
}

type HandlerError = (StatusCode, Json<StatusResponse>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(StatusResponse {
            status: message.into(),
        }),
    )
}

fn internal_error(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusResponse {
            status: message.into(),
        }),
    )
}

// ============================================================================
// Playback Control Endpoints
// ============================================================================

/// POST /playback/play - load a source by path and start once prepared
pub async fn play(
    State(ctx): State<AppContext>,
    Json(req): Json<PlayRequest>,
) -> Result<StatusCode, HandlerError> {
    if req.path.is_empty() {
        return Err(bad_request("path must not be empty"));
    }
    ctx.session.play(&req.path);
    Ok(StatusCode::ACCEPTED)
}

/// POST /playback/file - play media supplied in the request body
///
/// The body is spooled into an anonymous temporary file and the open
/// handle is passed to the session, so this operation never names a path
/// the service must be allowed to read.
pub async fn play_file(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    if body.is_empty() {
        return Err(bad_request("media body must not be empty"));
    }

    let spooled = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
        let mut file = tempfile::tempfile()?;
        file.write_all(&body)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(file)
    })
    .await
    .map_err(|e| internal_error(format!("spool task failed: {}", e)))?;

    let file = spooled.map_err(|e| {
        error!("failed to spool media body: {}", e);
        internal_error(format!("cannot spool media body: {}", e))
    })?;

    ctx.session.play_handle(file);
    Ok(StatusCode::ACCEPTED)
}

/// POST /playback/pause
pub async fn pause(State(ctx): State<AppContext>) -> StatusCode {
    ctx.session.pause();
    StatusCode::OK
}

/// POST /playback/stop
pub async fn stop(State(ctx): State<AppContext>) -> StatusCode {
    ctx.session.stop();
    StatusCode::OK
}

/// POST /playback/seek
pub async fn seek(State(ctx): State<AppContext>, Json(req): Json<SeekRequest>) -> StatusCode {
    ctx.session.seek_to(req.position_ms);
    StatusCode::OK
}

/// GET /playback/position
pub async fn get_position(State(ctx): State<AppContext>) -> Json<PositionResponse> {
    Json(PositionResponse {
        position_ms: ctx.session.position_ms(),
        duration_ms: ctx.session.duration_ms(),
        state: ctx.session.state().to_string(),
        playing: ctx.session.is_playing(),
    })
}

/// GET /playback/state
pub async fn get_state(State(ctx): State<AppContext>) -> Json<StateResponse> {
    Json(StateResponse {
        state: ctx.session.state().to_string(),
        playing: ctx.session.is_playing(),
        subscriber_count: ctx.session.subscriber_count(),
    })
}
