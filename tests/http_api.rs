//! REST API integration tests (spec §4.7), exercised via
//! `tower::ServiceExt::oneshot` against an in-memory store — no network
//! socket, no real MongoDB/Redis required.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use codegraph_query_engine::cache::backend::NullBackend;
use codegraph_query_engine::cache::CacheClient;
use codegraph_query_engine::config::Config;
use codegraph_query_engine::guidance::NullGuidanceProvider;
use codegraph_query_engine::model::{GraphNode, NodeKind};
use codegraph_query_engine::store::MemoryDocumentStore;
use codegraph_query_engine::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn node(id: &str, name: &str, full_name: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        name: name.to_string(),
        full_name: full_name.to_string(),
        kind,
        language: None,
        namespace: None,
        project: Some("Billing".to_string()),
        solution: Some("Acme.sln".to_string()),
        layer: None,
        source: None,
        is_abstract: false,
        is_static: false,
        is_sealed: false,
        accessibility: None,
        contains: vec![],
        contained_in: vec![],
        has_member: vec![],
        inherits: vec![],
        implements: vec![],
        calls: vec![],
        calls_via: vec![],
        indirect_call: vec![],
        uses: vec![],
    }
}

fn test_app() -> axum::Router {
    let store = Arc::new(MemoryDocumentStore::new());
    store.seed(
        "7.10.2",
        vec![node(
            "graph:class/billing/Acme.Billing.Invoice",
            "Invoice",
            "Acme.Billing.Invoice",
            NodeKind::Class,
        )],
    );
    let cache = Arc::new(CacheClient::new(Arc::new(NullBackend), Duration::from_secs(60)));
    let mut config = Config::from_env();
    config.cors_origins = vec!["*".to_string()];
    config.default_version = Some("7.10.2".to_string());
    let state = AppState::new(store, cache, Arc::new(NullGuidanceProvider), config);
    codegraph_query_engine::http::router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_versions_returns_seeded_version() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/graph/versions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["versions"][0], "7.10.2");
}

#[tokio::test]
async fn search_finds_seeded_class() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/graph/search")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "query": "Invoice", "version": "7.10.2" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["results"][0]["name"], "Invoice");
}

#[tokio::test]
async fn search_against_unknown_version_is_404() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/graph/search")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "query": "Invoice", "version": "9.0.0" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_node_round_trips_by_id() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/graph/node/graph:class%2Fbilling%2FAcme.Billing.Invoice?version=7.10.2")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_unknown_node_is_404() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/graph/node/graph:class%2Fbilling%2FNobody?version=7.10.2")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_max_depth_is_400() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/graph/callers")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "version": "7.10.2",
                "targetId": "graph:method/billing/Acme.Billing.Invoice.Total",
                "maxDepth": 99,
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cache_stats_reports_disabled_backend() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/cache/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn cache_clear_reports_zero_for_null_backend() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/cache/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cleared"], 0);
}
