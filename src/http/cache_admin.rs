//! Admin endpoints over the cache client (spec §4.7 "Cache administration").
//! These bypass `NodeQueryService` entirely — they operate on the cache
//! itself, not on graph data.

use crate::http::error::ApiError;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.cache.stats().await))
}

#[derive(Debug, Deserialize)]
pub struct KeysQuery {
    version: Option<String>,
    #[serde(default = "default_keys_limit")]
    limit: usize,
}

fn default_keys_limit() -> usize {
    100
}

pub async fn keys(State(state): State<AppState>, Query(q): Query<KeysQuery>) -> Json<Value> {
    let keys = state.cache.keys(q.version.as_deref(), q.limit).await;
    Json(json!({ "keys": keys, "count": keys.len() }))
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    version: Option<String>,
}

/// Clears every cache entry, optionally scoped to one version. There is no
/// per-operation scoping here — spec §4.7 only asks for version-wide or
/// full clears, since this engine's cache is never invalidated any other
/// way (the store is read-only from this crate's perspective).
pub async fn clear(
    State(state): State<AppState>,
    Query(q): Query<ClearQuery>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.cache.invalidate(None, q.version.as_deref()).await;
    Ok(Json(json!({ "cleared": removed })))
}
