use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing or invalid admin token")]
    Unauthorized,

    #[error("Storage failure")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Storage(e) => {
                // Clients only get the generic message
                tracing::error!(error = %format!("{e:#}"), "Request failed on storage");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "status": "error", "detail": self.to_string() }))).into_response()
    }
}
