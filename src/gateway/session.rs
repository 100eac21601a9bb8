//! Per-session tool-handler bundle (spec §4.8, §5 "Per-session state").
//!
//! An SSE client binds to exactly one graph version for the lifetime of its
//! stream; this is the process-wide `ToolGateway` seen through that lens.
//! Nothing here is mutable shared state — it is cheap to construct and drop
//! per connection/disconnection.

use super::ToolGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct ToolSession {
    gateway: Arc<ToolGateway>,
    version: String,
}

impl ToolSession {
    pub fn new(gateway: Arc<ToolGateway>, version: String) -> Self {
        Self { gateway, version }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub async fn call(&self, tool_name: &str, args: serde_json::Value) -> String {
        self.gateway.dispatch(tool_name, &self.version, args).await
    }

    pub fn tool_catalog(&self) -> Vec<super::ToolDescriptor> {
        self.gateway.catalog()
    }
}
