//! Global error mapper (spec §4.7, §7) — the HTTP layer's single place that
//! turns an `EngineError` into a status code and a JSON body; no handler
//! constructs its own error response.

use crate::error::EngineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            EngineError::VersionUnavailable { requested, available } => (
                StatusCode::NOT_FOUND,
                json!({
                    "kind": self.0.kind(),
                    "message": self.0.to_string(),
                    "requested": requested,
                    "available": available,
                }),
            ),
            EngineError::NodeNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "kind": self.0.kind(), "message": self.0.to_string(), "id": id }),
            ),
            EngineError::InvalidArgument(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "kind": self.0.kind(), "message": self.0.to_string() }),
            ),
            EngineError::StoreUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "kind": self.0.kind(), "message": "the graph store could not be reached" }),
            ),
            EngineError::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                json!({ "kind": self.0.kind(), "message": self.0.to_string() }),
            ),
            EngineError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "kind": self.0.kind(), "message": "internal error" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
