use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.session.latest();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tracking": snapshot.is_tracking,
    }))
}
