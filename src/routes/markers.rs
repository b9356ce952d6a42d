use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::session::{MarkerUpdate, NewMarker};
use crate::state::AppState;
use crate::types::marker::{Marker, MarkerType};

const MAX_LABEL_LEN: usize = 120;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/markers", get(list_markers).post(create_marker))
        .route("/api/markers/:id", put(update_marker).delete(delete_marker))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateMarkerRequest {
    lat: f64,
    lng: f64,
    #[serde(default)]
    label: String,
    #[serde(default, rename = "type")]
    marker_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateMarkerRequest {
    label: Option<String>,
    #[serde(rename = "type")]
    marker_type: Option<String>,
}

fn parse_marker_type(value: Option<&str>) -> Result<Option<MarkerType>, AppError> {
    value
        .map(|s| {
            MarkerType::from_str(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown marker type '{}'", s)))
        })
        .transpose()
}

fn validate_label(label: &str) -> Result<String, AppError> {
    let label = label.trim();
    if label.chars().count() > MAX_LABEL_LEN {
        return Err(AppError::BadRequest(format!(
            "Label too long (max {} characters)",
            MAX_LABEL_LEN
        )));
    }
    Ok(label.to_string())
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::BadRequest(format!(
            "Invalid marker coordinates: {}, {}",
            lat, lng
        )));
    }
    Ok(())
}

async fn list_markers(State(state): State<AppState>) -> Result<Json<Vec<Marker>>, AppError> {
    Ok(Json(state.session.markers().await?))
}

async fn create_marker(
    State(state): State<AppState>,
    Json(request): Json<CreateMarkerRequest>,
) -> Result<(StatusCode, Json<Marker>), AppError> {
    validate_coordinates(request.lat, request.lng)?;
    let label = validate_label(&request.label)?;
    let marker_type = parse_marker_type(request.marker_type.as_deref())?.unwrap_or_default();

    let marker = state
        .session
        .add_marker(NewMarker {
            lat: request.lat,
            lng: request.lng,
            label,
            marker_type,
        })
        .await??;

    tracing::info!(
        "Saved {} marker {} at {:.5}, {:.5}",
        marker.marker_type.as_str(),
        marker.id,
        marker.lat,
        marker.lng
    );
    Ok((StatusCode::CREATED, Json(marker)))
}

async fn update_marker(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateMarkerRequest>,
) -> Result<Json<Marker>, AppError> {
    let update = MarkerUpdate {
        label: request.label.as_deref().map(validate_label).transpose()?,
        marker_type: parse_marker_type(request.marker_type.as_deref())?,
    };

    state
        .session
        .update_marker(id.clone(), update)
        .await??
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("marker {}", id)))
}

async fn delete_marker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.session.delete_marker(id.clone()).await?? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("marker {}", id)))
    }
}
