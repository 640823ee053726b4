//! HTTP handlers for the mock device managers

use crate::api::AppContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct WifiResponse {
    pub enabled: bool,
    pub ssid: String,
}

#[derive(Debug, Serialize)]
pub struct BluetoothResponse {
    pub enabled: bool,
    pub paired_devices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NfcResponse {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct HvacRequest {
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct HvacResponse {
    pub zone: i32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct WindowRequest {
    pub window_id: i32,
    pub position: i32,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /connectivity/wifi
pub async fn get_wifi(State(ctx): State<AppContext>) -> Json<WifiResponse> {
    Json(WifiResponse {
        enabled: ctx.devices.wifi_enabled(),
        ssid: ctx.devices.ssid(),
    })
}

/// POST /connectivity/wifi
pub async fn set_wifi(
    State(ctx): State<AppContext>,
    Json(req): Json<EnabledRequest>,
) -> StatusCode {
    ctx.devices.set_wifi_enabled(req.enabled);
    StatusCode::OK
}

/// GET /connectivity/bluetooth
pub async fn get_bluetooth(State(ctx): State<AppContext>) -> Json<BluetoothResponse> {
    Json(BluetoothResponse {
        enabled: ctx.devices.bluetooth_enabled(),
        paired_devices: ctx.devices.paired_devices(),
    })
}

/// POST /connectivity/bluetooth
pub async fn set_bluetooth(
    State(ctx): State<AppContext>,
    Json(req): Json<EnabledRequest>,
) -> StatusCode {
    ctx.devices.set_bluetooth_enabled(req.enabled);
    StatusCode::OK
}

/// GET /connectivity/nfc
pub async fn get_nfc(State(ctx): State<AppContext>) -> Json<NfcResponse> {
    Json(NfcResponse {
        enabled: ctx.devices.nfc_enabled(),
    })
}

/// GET /connectivity/hvac/:zone
pub async fn get_hvac(
    State(ctx): State<AppContext>,
    Path(zone): Path<i32>,
) -> Json<HvacResponse> {
    Json(HvacResponse {
        zone,
        temperature: ctx.devices.hvac_temperature(zone),
    })
}

/// POST /connectivity/hvac/:zone
pub async fn set_hvac(
    State(ctx): State<AppContext>,
    Path(zone): Path<i32>,
    Json(req): Json<HvacRequest>,
) -> StatusCode {
    ctx.devices.set_hvac_temperature(zone, req.temperature);
    StatusCode::OK
}

/// POST /connectivity/window
pub async fn set_window(
    State(ctx): State<AppContext>,
    Json(req): Json<WindowRequest>,
) -> StatusCode {
    ctx.devices.set_window_position(req.window_id, req.position);
    StatusCode::OK
}
