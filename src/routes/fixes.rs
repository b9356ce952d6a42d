use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::engine::FixOutcome;
use crate::error::AppError;
use crate::routes::session::SessionResponse;
use crate::state::AppState;
use crate::types::fix::Fix;

const MAX_BATCH: usize = 500;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/fixes", post(push_fixes))
        .route("/api/fixes/error", post(report_error))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixBatch {
    // Tried first: a struct with defaulted fields would also accept a sequence.
    Many(Vec<Fix>),
    One(Fix),
}

#[derive(Serialize)]
struct FixResponse {
    outcomes: Vec<FixOutcome>,
    session: SessionResponse,
}

#[derive(Deserialize)]
struct FixErrorRequest {
    message: String,
}

async fn push_fixes(
    State(state): State<AppState>,
    Json(batch): Json<FixBatch>,
) -> Result<Json<FixResponse>, AppError> {
    let fixes = match batch {
        FixBatch::Many(fixes) => fixes,
        FixBatch::One(fix) => vec![fix],
    };

    if fixes.len() > MAX_BATCH {
        return Err(AppError::BadRequest(format!(
            "Too many fixes in one request: {} (max {})",
            fixes.len(),
            MAX_BATCH
        )));
    }

    let (outcomes, snapshot) = state.session.push_fixes(fixes).await?;
    Ok(Json(FixResponse {
        outcomes,
        session: SessionResponse::new(&state, snapshot),
    }))
}

async fn report_error(
    State(state): State<AppState>,
    Json(request): Json<FixErrorRequest>,
) -> Result<StatusCode, AppError> {
    state.session.report_fix_error(request.message).await?;
    Ok(StatusCode::ACCEPTED)
}
