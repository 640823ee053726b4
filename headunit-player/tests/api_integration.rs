//! HTTP surface integration tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`; no
//! listening socket required.

mod helpers;

use axum::body::Body;
use axum::Router;
use headunit_player::api::{create_router, AppContext};
use headunit_player::devices::DeviceHub;
use headunit_player::PlayerSession;
use helpers::write_sine_wav;
use http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<PlayerSession>) {
    let session = PlayerSession::new();
    let ctx = AppContext {
        session: Arc::clone(&session),
        devices: Arc::new(DeviceHub::new()),
        port: 0,
    };
    (create_router(ctx), session)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn wait_for_playing(app: &Router) {
    for _ in 0..250 {
        let response = app.clone().oneshot(get("/api/v1/playback/position")).await.unwrap();
        let body = json_body(response).await;
        if body["playing"] == json!(true) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("player never reached playing");
}

#[tokio::test]
async fn health_reports_module_and_version() {
    let (app, _session) = test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "headunit-player");
}

#[tokio::test]
async fn play_rejects_empty_path() {
    let (app, _session) = test_app();
    let response = app
        .oneshot(post_json("/api/v1/playback/play", json!({ "path": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn playback_flow_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("track.wav");
    write_sine_wav(&track, 10_000);

    let (app, _session) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/playback/play",
            json!({ "path": track.to_str().unwrap() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    wait_for_playing(&app).await;

    // seek forward, position follows
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/playback/seek",
            json!({ "position_ms": 5_000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/playback/position"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["duration_ms"], json!(10_000));
    assert!(body["position_ms"].as_u64().unwrap() >= 5_000);

    // pause
    let response = app
        .clone()
        .oneshot(post_empty("/api/v1/playback/pause"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/playback/state"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["state"], "paused");
    assert_eq!(body["playing"], json!(false));

    // stop resets the reads to zero
    let response = app
        .clone()
        .oneshot(post_empty("/api/v1/playback/stop"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/playback/position"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["state"], "stopped");
    assert_eq!(body["position_ms"], json!(0));
    assert_eq!(body["duration_ms"], json!(0));
}

#[tokio::test]
async fn uploaded_media_plays_from_anonymous_handle() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("track.wav");
    write_sine_wav(&track, 5_000);
    let media = std::fs::read(&track).unwrap();

    let (app, _session) = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/playback/file")
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .body(Body::from(media))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    wait_for_playing(&app).await;
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let (app, _session) = test_app();
    let response = app
        .oneshot(post_empty("/api/v1/playback/file"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sse_stream_delivers_playback_events() {
    let dir = tempfile::tempdir().unwrap();
    let track = dir.path().join("track.wav");
    write_sine_wav(&track, 10_000);

    let (app, _session) = test_app();

    let sse_response = app.clone().oneshot(get("/api/v1/events")).await.unwrap();
    assert_eq!(sse_response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/playback/play",
            json!({ "path": track.to_str().unwrap() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let mut body = sse_response.into_body();
    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let frame = tokio::time::timeout_at(deadline, body.frame())
            .await
            .expect("timed out waiting for SSE frame")
            .expect("SSE stream ended")
            .expect("SSE frame error");
        if let Some(data) = frame.data_ref() {
            received.push_str(&String::from_utf8_lossy(data));
            if received.contains("event: Started") && received.contains("duration_ms") {
                break;
            }
        }
    }
}

#[tokio::test]
async fn connectivity_endpoints_round_trip() {
    let (app, _session) = test_app();

    // wifi defaults off with unknown ssid
    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/wifi"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["enabled"], json!(false));
    assert_eq!(body["ssid"], "<unknown>");

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/connectivity/wifi",
            json!({ "enabled": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/wifi"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["enabled"], json!(true));
    assert_eq!(body["ssid"], "Demo_WiFi_5G");

    // bluetooth pairing list is fixed
    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/bluetooth"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["paired_devices"], json!(["MyPhone", "Headset X", "CarKit"]));

    // nfc mock is always on
    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/nfc"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["enabled"], json!(true));

    // hvac zones default to 22.0 and accept updates
    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/hvac/0"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["temperature"], json!(22.0));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/connectivity/hvac/0",
            json!({ "temperature": 18.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(
        app.clone()
            .oneshot(get("/api/v1/connectivity/hvac/0"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["temperature"], json!(18.5));

    // window setter is accepted
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/connectivity/window",
            json!({ "window_id": 2, "position": 40 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
