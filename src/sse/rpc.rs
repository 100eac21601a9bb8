//! JSON-RPC 2.0 message shapes (spec §4.8, §6 "JSON-RPC surface").
//!
//! Only the three methods the gateway actually exposes are implemented:
//! `initialize`, `tools/list`, `tools/call`. Anything else is a JSON-RPC
//! "method not found" error, not an HTTP-level failure.

use crate::gateway::ToolSession;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn default_jsonrpc() -> String {
    "2.0".to_string()
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message: message.into() }),
        }
    }
}

const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

/// Dispatches one JSON-RPC request against a session's tool bundle. Always
/// returns a response — never panics, never propagates a Rust error, per
/// the JSON-RPC contract.
pub async fn handle(session: &ToolSession, request: JsonRpcRequest) -> JsonRpcResponse {
    match request.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            request.id,
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": { "name": "codegraph-query-engine", "version": crate::version() },
                "capabilities": { "tools": {} },
            }),
        ),
        "tools/list" => JsonRpcResponse::ok(
            request.id,
            json!({ "tools": session.tool_catalog() }),
        ),
        "tools/call" => {
            let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                return JsonRpcResponse::err(request.id, INVALID_PARAMS, "missing `name`");
            };
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));
            let markdown = session.call(name, arguments).await;
            JsonRpcResponse::ok(
                request.id,
                json!({ "content": [{ "type": "text", "text": markdown }] }),
            )
        }
        other => JsonRpcResponse::err(
            request.id,
            METHOD_NOT_FOUND,
            format!("unknown method `{other}`"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheClient;
    use crate::gateway::ToolGateway;
    use crate::guidance::NullGuidanceProvider;
    use crate::query::NodeQueryService;
    use crate::store::MemoryDocumentStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> ToolSession {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(CacheClient::new(
            Arc::new(crate::cache::backend::NullBackend),
            Duration::from_secs(60),
        ));
        let query = Arc::new(NodeQueryService::new(store, cache));
        let gateway = Arc::new(ToolGateway::new(query, Arc::new(NullGuidanceProvider)));
        ToolSession::new(gateway, "7.10.2".to_string())
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let response = handle(
            &session(),
            JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: json!(1),
                method: "initialize".to_string(),
                params: Value::Null,
            },
        )
        .await;
        assert!(response.result.unwrap()["serverInfo"]["name"].is_string());
    }

    #[tokio::test]
    async fn unknown_method_yields_json_rpc_error() {
        let response = handle(
            &session(),
            JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: json!(2),
                method: "nonsense".to_string(),
                params: Value::Null,
            },
        )
        .await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn tools_call_without_name_is_invalid_params() {
        let response = handle(
            &session(),
            JsonRpcRequest {
                jsonrpc: "2.0".to_string(),
                id: json!(3),
                method: "tools/call".to_string(),
                params: json!({}),
            },
        )
        .await;
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }
}
