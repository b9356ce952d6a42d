use std::time::Duration;

use axum::{body::to_bytes, http::Request, Router};
use monotrack_rs::engine::metrics::EARTH_RADIUS_M;
use monotrack_rs::store::MemoryStore;
use monotrack_rs::{config::Config, routes, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_with_store(store: MemoryStore) -> (Router, AppState) {
    let state = AppState::with_store(Config::default(), Box::new(store));
    let app = Router::new()
        .merge(routes::session::router())
        .merge(routes::fixes::router())
        .merge(routes::history::router())
        .merge(routes::stats::router())
        .with_state(state.clone());
    (app, state)
}

fn lng_for_meters(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (axum::http::StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(json.to_string())
        }
        None => axum::body::Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn full_session_is_persisted_on_stop() {
    let store = MemoryStore::new();
    let (app, _) = app_with_store(store.clone());

    let (status, body) = send(&app, "POST", "/api/session/start", None).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["isTracking"], true);
    assert_eq!(body["mode"], "walking");

    let fixes = json!([
        {"lat": 0.0, "lng": 0.0, "accuracyMeters": 8.0},
        {"lat": 0.0, "lng": lng_for_meters(20.0), "accuracyMeters": 8.0},
        {"lat": 0.0, "lng": lng_for_meters(20.3), "accuracyMeters": 8.0},
        {"lat": null, "lng": 1.0}
    ]);
    let (status, body) = send(&app, "POST", "/api/fixes", Some(fixes)).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    let outcomes: Vec<&str> = body["outcomes"]
        .as_array()
        .expect("outcomes")
        .iter()
        .map(|o| o["outcome"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(outcomes, vec!["recorded", "recorded", "location_only", "dropped"]);
    assert_eq!(body["outcomes"][2]["reason"], "jitter");
    assert_eq!(body["outcomes"][3]["reason"], "non_finite_coordinates");
    assert_eq!(body["session"]["liveSteps"], 26);

    let (status, body) = send(&app, "PUT", "/api/session/mode", Some(json!({"mode": "bike"}))).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["currentRoute"]["segments"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["activeSegment"]["mode"], "bike");

    let (status, body) = send(&app, "POST", "/api/session/stop", None).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["saved"], true);
    assert_eq!(body["snapshot"]["isTracking"], false);
    assert_eq!(body["route"]["segments"].as_array().map(Vec::len), Some(1));

    let saved = store.routes();
    assert_eq!(saved.len(), 1);
    assert!((saved[0].total_distance_meters - 20.0).abs() < 1e-6);

    let (status, body) = send(&app, "GET", "/api/routes", None).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["totalRoutes"], 1);
    assert_eq!(body["topRoutes"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn stop_without_movement_saves_nothing() {
    let store = MemoryStore::new();
    let (app, _) = app_with_store(store.clone());

    send(&app, "POST", "/api/session/start", None).await;
    let (status, body) = send(&app, "POST", "/api/session/stop", None).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["saved"], false);
    assert!(body["route"].is_null());
    assert_eq!(store.route_saves(), 0);
}

#[tokio::test]
async fn toggle_pauses_and_resumes() {
    let (app, _) = app_with_store(MemoryStore::new());

    let (_, body) = send(&app, "POST", "/api/session/toggle", None).await;
    assert_eq!(body["isTracking"], true);

    let (_, body) = send(&app, "POST", "/api/session/toggle", None).await;
    assert_eq!(body["isTracking"], false);
    assert_eq!(body["isPaused"], true);
    assert!(body["activeSegment"].is_object());

    let (_, body) = send(&app, "POST", "/api/session/toggle", None).await;
    assert_eq!(body["isTracking"], true);
    assert_eq!(body["isPaused"], false);
}

#[tokio::test]
async fn unknown_mode_is_rejected() {
    let (app, _) = app_with_store(MemoryStore::new());
    let (status, body) = send(&app, "PUT", "/api/session/mode", Some(json!({"mode": "rocket"}))).await;
    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("rocket"));
}

#[tokio::test]
async fn fix_source_errors_do_not_change_state() {
    let (app, _) = app_with_store(MemoryStore::new());
    send(&app, "POST", "/api/session/start", None).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/fixes/error",
        Some(json!({"message": "permission denied"})),
    )
    .await;
    assert_eq!(status, axum::http::StatusCode::ACCEPTED);

    let (_, body) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(body["isTracking"], true);
}

#[tokio::test]
async fn snapshots_tick_while_tracking() {
    let config = Config {
        tick_interval: Duration::from_millis(20),
        ..Config::default()
    };
    let state = AppState::with_store(config, Box::new(MemoryStore::new()));
    let mut snapshots = state.session.subscribe();

    state.session.start().await.expect("start");
    tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.is_tracking && s.elapsed_time_ms >= 100),
    )
    .await
    .expect("ticked in time")
    .expect("session alive");

    state.session.stop().await.expect("stop");
    tokio::time::timeout(Duration::from_secs(5), snapshots.wait_for(|s| !s.is_tracking))
        .await
        .expect("stopped in time")
        .expect("session alive");
    assert_eq!(state.session.latest().elapsed_time_ms, 0);
}

#[tokio::test]
async fn gpx_export_for_unknown_route_is_not_found() {
    let (app, _) = app_with_store(MemoryStore::new());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/routes/nope/gpx")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
