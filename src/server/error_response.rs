//! JSON error bodies for classified catalog failures.

use crate::catalog::CatalogError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    pub error: String,
    /// RFC 3339
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            message: message.into(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::AlreadyExists(_) => StatusCode::CONFLICT,
        CatalogError::EmptyResult(_) => StatusCode::NO_CONTENT,
        CatalogError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CatalogError::InvalidQuery(_) | CatalogError::InvalidSong(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("Responding {}: {}", status, self);
        } else {
            warn!("Responding {}: {}", status, self);
        }

        // 204 carries no body.
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, Json(ErrorResponse::new(status, self.to_string()))).into_response()
    }
}
