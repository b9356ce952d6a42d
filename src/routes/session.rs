use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::format::{format_distance, format_duration};
use crate::session::StopReport;
use crate::state::AppState;
use crate::types::mode::MovementMode;
use crate::types::snapshot::TrackerSnapshot;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(current))
        .route("/api/session/start", post(start))
        .route("/api/session/toggle", post(toggle))
        .route("/api/session/stop", post(stop))
        .route("/api/session/mode", put(set_mode))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    #[serde(flatten)]
    snapshot: TrackerSnapshot,
    distance_label: String,
    elapsed_label: String,
    tick_interval_ms: u64,
}

impl SessionResponse {
    pub(crate) fn new(state: &AppState, snapshot: TrackerSnapshot) -> Self {
        Self {
            distance_label: format_distance(snapshot.live_distance),
            elapsed_label: format_duration(snapshot.elapsed_time_ms),
            tick_interval_ms: state.config.tick_interval.as_millis() as u64,
            snapshot,
        }
    }
}

#[derive(Deserialize)]
struct ModeRequest {
    mode: String,
}

async fn current(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.session.snapshot().await?;
    Ok(Json(SessionResponse::new(&state, snapshot)))
}

async fn start(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.session.start().await?;
    Ok(Json(SessionResponse::new(&state, snapshot)))
}

async fn toggle(State(state): State<AppState>) -> Result<Json<SessionResponse>, AppError> {
    let snapshot = state.session.toggle().await?;
    Ok(Json(SessionResponse::new(&state, snapshot)))
}

async fn stop(State(state): State<AppState>) -> Result<Json<StopReport>, AppError> {
    let report = state.session.stop().await?;
    Ok(Json(report))
}

async fn set_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mode = MovementMode::from_str(&request.mode).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown movement mode '{}'. Expected one of: {}",
            request.mode,
            MovementMode::ALL.map(|m| m.as_str()).join(", ")
        ))
    })?;

    let snapshot = state.session.set_mode(mode).await?;
    Ok(Json(SessionResponse::new(&state, snapshot)))
}
