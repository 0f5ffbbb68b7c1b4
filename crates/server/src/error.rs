//! API error type that maps [`FolioError`] variants to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_types::FolioError;
use serde_json::json;

/// Wrapper around [`FolioError`] that implements [`IntoResponse`].
#[derive(Debug)]
pub struct ApiError(pub FolioError);

impl ApiError {
    /// Returns `(status, error_type)` for the wrapped error.
    fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            FolioError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            FolioError::UpstreamAuth { .. }
            | FolioError::UpstreamFetch { .. }
            | FolioError::Http(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            FolioError::Parse(_) => (StatusCode::BAD_GATEWAY, "parse_error"),
            FolioError::Config(_) | FolioError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();
        let msg = self.0.to_string();
        tracing::error!(status = status.as_u16(), error = %msg, "request failed");
        (
            status,
            Json(json!({
                "error": {
                    "message": msg,
                    "type": error_type,
                }
            })),
        )
            .into_response()
    }
}

impl From<FolioError> for ApiError {
    fn from(e: FolioError) -> Self {
        Self(e)
    }
}
