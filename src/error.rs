use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Stored {key} is not valid JSON: {source}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage task failed: {0}")]
    Task(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Tracking session is no longer running")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("GPX generation failed: {0}")]
    Gpx(String),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Session(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Store(_) | AppError::Export(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
