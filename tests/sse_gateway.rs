//! JSON-RPC-over-SSE integration tests (spec §4.8), driving `/sse` and
//! `/messages` through `tower::ServiceExt::oneshot` against an in-memory
//! store, reading the SSE body as raw `text/event-stream` bytes.

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
use serde_json::json;
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
        project: None,
        solution: None,
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

fn test_state() -> AppState {
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
    let config = Config::from_env();
    AppState::new(store, cache, Arc::new(NullGuidanceProvider), config)
}

/// Reads just the first SSE frame's `data:` payload. The stream itself never
/// ends on its own (the session stays open for keep-alive pings), so this
/// pulls one frame rather than collecting the whole body.
async fn first_event_data(response: axum::response::Response) -> String {
    use http_body_util::BodyExt as _;
    let mut body = response.into_body();
    let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
        .await
        .expect("first sse frame")
        .expect("frame stream should not be empty")
        .expect("frame should not be an error");
    let bytes = frame.into_data().expect("frame should carry data");
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    text.lines()
        .find_map(|l| l.strip_prefix("data:"))
        .unwrap()
        .trim()
        .to_string()
}

#[tokio::test]
async fn opening_a_session_sends_an_endpoint_event() {
    let state = test_state();
    let app = codegraph_query_engine::http::router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/sse?version=7.10.2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data = first_event_data(response).await;
    assert!(data.starts_with("/messages?sessionId="));
}

#[tokio::test]
async fn opening_a_session_against_unknown_version_is_an_error() {
    let state = test_state();
    let app = codegraph_query_engine::http::router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/sse?version=9.0.0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn message_for_unknown_session_is_not_found() {
    let state = test_state();
    let app = codegraph_query_engine::http::router(state);
    let request = Request::builder()
        .method("POST")
        .uri("/messages?sessionId=does-not-exist")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tools_list_surfaces_the_full_catalog_through_rpc() {
    use codegraph_query_engine::gateway::ToolSession;
    use codegraph_query_engine::sse::rpc::{handle, JsonRpcRequest};

    let state = test_state();
    let session = ToolSession::new(state.gateway.clone(), "7.10.2".to_string());
    let response = handle(
        &session,
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            method: "tools/list".to_string(),
            params: serde_json::Value::Null,
        },
    )
    .await;
    let tools = response.result.unwrap()["tools"].as_array().unwrap().len();
    assert_eq!(tools, 11);
}

#[tokio::test]
async fn tools_call_search_code_returns_markdown_in_content() {
    use codegraph_query_engine::gateway::ToolSession;
    use codegraph_query_engine::sse::rpc::{handle, JsonRpcRequest};

    let state = test_state();
    let session = ToolSession::new(state.gateway.clone(), "7.10.2".to_string());
    let response = handle(
        &session,
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(2),
            method: "tools/call".to_string(),
            params: json!({ "name": "search_code", "arguments": { "query": "Invoice" } }),
        },
    )
    .await;
    let text = response.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
    assert!(text.contains("Invoice"));
}
