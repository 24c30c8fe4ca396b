//! Maps directory errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use handle_directory::{DirectoryError, StoreError};
use serde_json::json;

/// Error returned by directory handlers.
#[derive(Debug)]
pub struct ApiError(pub DirectoryError);

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        ApiError(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DirectoryError::Validation { .. } => StatusCode::BAD_REQUEST,
            DirectoryError::InvalidHandleFormat { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DirectoryError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            DirectoryError::Store(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
            DirectoryError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            DirectoryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "Directory request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "Directory store unavailable".to_string(),
                _ => "Internal error".to_string(),
            }
        } else {
            self.0.to_string()
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
