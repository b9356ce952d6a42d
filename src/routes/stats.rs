use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use serde::Serialize;

use crate::analytics::{calculate_analytics, top_routes, AnalyticsData, TOP_ROUTES};
use crate::error::AppError;
use crate::state::AppState;
use crate::types::route::Route;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(flatten)]
    analytics: AnalyticsData,
    total_routes: usize,
    top_routes: Vec<Route>,
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let routes = state.session.routes().await?;
    let analytics = calculate_analytics(&routes, &Local::now());

    Ok(Json(StatsResponse {
        analytics,
        total_routes: routes.len(),
        top_routes: top_routes(&routes, TOP_ROUTES),
    }))
}
