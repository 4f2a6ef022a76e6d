//! Liveness, metrics, and catalog endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::http::errors::ApiError;
use crate::models::{AVAILABLE_MODELS, ModelInfo};
use crate::state::ApiState;

/// `GET /healthz`
pub(crate) async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/models`
pub(crate) async fn list_models() -> Json<&'static [ModelInfo]> {
    Json(AVAILABLE_MODELS)
}

/// `GET /metrics`
pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    let rendered = state
        .metrics
        .render()
        .map_err(|err| ApiError::internal(format!("failed to render metrics: {err}")))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        rendered,
    )
        .into_response())
}
