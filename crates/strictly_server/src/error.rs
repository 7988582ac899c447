//! HTTP API error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde_json::json;
use strictly_gomoku::RegistryError;
use tracing::warn;

/// Error returned by REST handlers.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ApiError {
    /// Registry refused the request.
    #[display("{}", _0)]
    Registry(RegistryError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::AlreadyExists(_)) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
