//! REST handlers (spec §4.7). Every handler returns JSON, not Markdown —
//! the Markdown renderers in [`crate::render`] are for the tool-gateway
//! surface only.

use crate::http::error::ApiError;
use crate::model::NodeKind;
use crate::query::SearchParams;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let store_ok = state.store.list_versions().await.is_ok();
    let cache_ok = state.cache.is_healthy().await;
    Json(json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "store": store_ok,
        "cache": cache_ok,
        "version": crate::version(),
    }))
}

pub async fn list_versions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let versions = state.query.list_versions().await?;
    Ok(Json(json!({ "versions": versions, "count": versions.len() })))
}

#[derive(Debug, Deserialize)]
pub struct VersionPath {
    version: String,
}

pub async fn statistics(
    State(state): State<AppState>,
    Path(path): Path<VersionPath>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.query.statistics(&path.version).await?;
    Ok(Json(json!(stats)))
}

pub async fn semantic_stats(
    State(state): State<AppState>,
    Path(path): Path<VersionPath>,
) -> Result<Json<Value>, ApiError> {
    let stats = state.query.semantic_stats(&path.version).await?;
    Ok(Json(json!(stats)))
}

fn parse_kind(raw: &Option<String>) -> Result<Option<NodeKind>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NodeKind::from_str(s)
            .map(Some)
            .map_err(|_| crate::error::EngineError::InvalidArgument(format!("unknown kind `{s}`")).into()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub version: String,
    pub kind: Option<String>,
    pub solution: Option<String>,
    pub project: Option<String>,
    pub layer: Option<String>,
    pub containing_class: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_exact_first")]
    pub exact_first: bool,
}

fn default_limit() -> usize {
    20
}
fn default_exact_first() -> bool {
    true
}

pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&req.kind)?;
    let params = SearchParams {
        query: req.query,
        kind,
        solution: req.solution,
        project: req.project,
        layer: req.layer,
        containing_class: req.containing_class,
        limit: req.limit,
        exact_first: req.exact_first,
    };
    let outcome = state.query.search(&req.version, params).await?;
    Ok(Json(json!(outcome)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallersRequest {
    pub version: String,
    pub target_id: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub include_indirect: bool,
}

fn default_max_depth() -> u32 {
    3
}

pub async fn find_callers(
    State(state): State<AppState>,
    Json(req): Json<CallersRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .query
        .find_callers(&req.version, &req.target_id, req.max_depth, req.include_indirect)
        .await?;
    Ok(Json(json!(result)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalleesRequest {
    pub version: String,
    pub source_id: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub include_via_interface: bool,
}

pub async fn find_callees(
    State(state): State<AppState>,
    Json(req): Json<CalleesRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .query
        .find_callees(
            &req.version,
            &req.source_id,
            req.max_depth,
            req.include_via_interface,
        )
        .await?;
    Ok(Json(json!(result)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationsRequest {
    pub version: String,
    pub interface_id: String,
}

pub async fn find_implementations(
    State(state): State<AppState>,
    Json(req): Json<ImplementationsRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .query
        .find_implementations(&req.version, &req.interface_id)
        .await?;
    Ok(Json(json!(result)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritanceRequest {
    pub version: String,
    pub class_id: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

pub async fn find_inheritance_chain(
    State(state): State<AppState>,
    Json(req): Json<InheritanceRequest>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .query
        .find_inheritance_chain(&req.version, &req.class_id, req.max_depth)
        .await?;
    Ok(Json(json!(result)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRequest {
    pub version: String,
    pub node_id: String,
}

pub async fn analyze_impact(
    State(state): State<AppState>,
    Json(req): Json<ImpactRequest>,
) -> Result<Json<Value>, ApiError> {
    let result =
        crate::impact::analyze_impact(state.query.store().as_ref(), &req.version, &req.node_id)
            .await?;
    Ok(Json(json!(result)))
}

#[derive(Debug, Deserialize)]
pub struct NodeQuery {
    version: String,
}

pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<NodeQuery>,
) -> Result<Json<Value>, ApiError> {
    match state.query.get_by_id(&q.version, &id).await? {
        Some(node) => Ok(Json(json!(node))),
        None => Err(crate::error::EngineError::NodeNotFound(id).into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    version: String,
    query: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(q): Query<ListProjectsQuery>,
) -> Result<Json<Value>, ApiError> {
    let projects = state.query.list_projects(&q.version, q.query, q.limit).await?;
    Ok(Json(json!({ "projects": projects, "count": projects.len() })))
}

#[derive(Debug, Deserialize)]
pub struct ProjectStructureQuery {
    version: String,
    project: String,
    kind: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

pub async fn get_project_structure(
    State(state): State<AppState>,
    Query(q): Query<ProjectStructureQuery>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&q.kind)?;
    let structure = state
        .query
        .get_project_structure(&q.version, &q.project, kind, q.limit)
        .await?;
    Ok(Json(json!(structure)))
}
