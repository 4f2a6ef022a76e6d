//! Configuration version endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use modelgate_config::{ConfigVersion, EffectiveConfig, NewConfigVersion, PublishOutcome};

use crate::http::errors::{ApiError, map_config_error};
use crate::models::HistoryQuery;
use crate::state::ApiState;

/// `GET /config/active`: the active version, or JSON `null`.
pub(crate) async fn get_active_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Option<ConfigVersion>>, ApiError> {
    let active = state
        .config
        .active_version()
        .await
        .map_err(|err| map_config_error(err, "failed to load active configuration"))?;
    Ok(Json(active))
}

/// `GET /config/history`: recent versions, newest first.
pub(crate) async fn get_config_history(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ConfigVersion>>, ApiError> {
    let versions = state
        .config
        .list_versions(query.limit)
        .await
        .map_err(|err| map_config_error(err, "failed to list configuration versions"))?;
    Ok(Json(versions))
}

/// `GET /api/config`: the configuration that applies right now.
pub(crate) async fn get_effective_config(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<EffectiveConfig>, ApiError> {
    let effective = state
        .config
        .resolve_effective()
        .await
        .map_err(|err| map_config_error(err, "failed to resolve effective configuration"))?;
    Ok(Json(effective))
}

/// `POST /config`: validate and store a new, inert version.
pub(crate) async fn create_config(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<NewConfigVersion>,
) -> Result<Json<ConfigVersion>, ApiError> {
    let created = state
        .config
        .create_version(payload)
        .await
        .map_err(|err| map_config_error(err, "failed to create configuration version"))?;
    Ok(Json(created))
}

/// `POST /config/{id}/publish`: atomically activate one version.
pub(crate) async fn publish_config(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<PublishOutcome>, ApiError> {
    let outcome = state
        .config
        .publish_version(id)
        .await
        .map_err(|err| map_config_error(err, "failed to publish configuration version"))?;
    Ok(Json(outcome))
}
