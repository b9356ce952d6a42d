use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::AppError;
use crate::export::{route_to_gpx, HistoryExport};
use crate::state::AppState;
use crate::types::route::Route;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/routes", get(list_routes).delete(clear_routes))
        .route("/api/routes/export", get(export_history))
        .route("/api/routes/:id/gpx", get(export_gpx))
}

#[derive(Serialize)]
struct RoutesResponse {
    count: usize,
    routes: Vec<Route>,
}

async fn list_routes(State(state): State<AppState>) -> Result<Json<RoutesResponse>, AppError> {
    let routes = state.session.routes().await?;
    Ok(Json(RoutesResponse {
        count: routes.len(),
        routes,
    }))
}

async fn clear_routes(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.clear_routes().await??;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_history(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let routes = state.session.routes().await?;
    let markers = state.session.markers().await?;
    let export = HistoryExport::new(routes, markers);
    let body = export.to_json_bytes()?;

    tracing::info!(
        "Exported {} routes and {} markers",
        export.routes.len(),
        export.markers.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"monotrack-export.json\"",
            ),
        ],
        body,
    ))
}

async fn export_gpx(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let routes = state.session.routes().await?;
    let route = routes
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound(format!("route {}", id)))?;

    let gpx = route_to_gpx(route)?;
    let disposition = format!("attachment; filename=\"route-{}.gpx\"", route.id);

    Ok((
        [
            (header::CONTENT_TYPE, "application/gpx+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        gpx,
    ))
}
