//! Tool Gateway (spec §4.6) — a fixed catalog of tools, each with a name, a
//! description, and a JSON-schema for its arguments. Dispatch looks up the
//! handler by name, binds it to the session's version, invokes it, and
//! catches any error into a rendered Markdown block — callers of
//! [`ToolGateway::dispatch`] never see a raw `EngineError`.
//!
//! A trait-object registry keyed by name (`HashMap<String, Arc<dyn
//! GatewayTool>>`) with per-tool typed argument structs rather than
//! free-form `Value` execution, so a malformed argument fails schema
//! validation at the boundary instead of panicking deep in a handler.

pub mod args;
pub mod session;
pub mod tools;

pub use session::ToolSession;

use crate::error::EngineError;
use crate::guidance::GuidanceProvider;
use crate::query::NodeQueryService;
use crate::render;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait GatewayTool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn parameters(&self) -> Value;
    async fn execute(&self, version: &str, args: Value) -> crate::error::EngineResult<String>;
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

pub struct ToolGateway {
    registry: HashMap<String, Arc<dyn GatewayTool>>,
}

impl ToolGateway {
    /// Registers the fixed catalog named in spec §4.6. `query` backs every
    /// search/traversal/catalog tool; `guidance` backs only
    /// `get_tailored_guidance`.
    pub fn new(query: Arc<NodeQueryService>, guidance: Arc<dyn GuidanceProvider>) -> Self {
        let mut registry: HashMap<String, Arc<dyn GatewayTool>> = HashMap::new();
        let mut register = |tool: Arc<dyn GatewayTool>| {
            registry.insert(tool.name().to_string(), tool);
        };

        register(Arc::new(tools::SearchCodeTool::new(query.clone())));
        register(Arc::new(tools::GetCodeContextTool::new(query.clone())));
        register(Arc::new(tools::ListProjectsTool::new(query.clone())));
        register(Arc::new(tools::GetProjectStructureTool::new(query.clone())));
        register(Arc::new(tools::GetStatisticsTool::new(query.clone())));
        register(Arc::new(tools::FindImplementationsTool::new(query.clone())));
        register(Arc::new(tools::FindCallersTool::new(query.clone())));
        register(Arc::new(tools::FindCalleesTool::new(query.clone())));
        register(Arc::new(tools::FindInheritanceChainTool::new(query.clone())));
        register(Arc::new(tools::AnalyzeImpactTool::new(query)));
        register(Arc::new(tools::GetTailoredGuidanceTool::new(guidance)));

        Self { registry }
    }

    pub fn catalog(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self
            .registry
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Step 3-4 of spec §4.6: invoke, catch, render. Always returns Markdown
    /// — an unknown tool name or a propagated `EngineError` both become an
    /// error block rather than a `Result`.
    pub async fn dispatch(&self, tool_name: &str, version: &str, args: Value) -> String {
        debug!(tool = tool_name, version, "gateway dispatch");
        let Some(tool) = self.registry.get(tool_name) else {
            warn!(tool = tool_name, "unknown tool requested");
            return render::error::render(&EngineError::InvalidArgument(format!(
                "unknown tool `{tool_name}`"
            )));
        };
        match tool.execute(version, args).await {
            Ok(markdown) => markdown,
            Err(err) => {
                warn!(tool = tool_name, kind = err.kind(), "tool call failed");
                render::error::render(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheClient;
    use crate::guidance::NullGuidanceProvider;
    use crate::store::MemoryDocumentStore;
    use std::time::Duration;

    fn gateway() -> ToolGateway {
        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(CacheClient::new(
            Arc::new(crate::cache::backend::NullBackend),
            Duration::from_secs(60),
        ));
        let query = Arc::new(NodeQueryService::new(store, cache));
        ToolGateway::new(query, Arc::new(NullGuidanceProvider))
    }

    #[test]
    fn catalog_lists_every_spec_tool() {
        let names: Vec<String> = gateway().catalog().into_iter().map(|d| d.name).collect();
        for expected in [
            "search_code",
            "get_code_context",
            "list_projects",
            "get_project_structure",
            "get_statistics",
            "find_implementations",
            "find_callers",
            "find_callees",
            "find_inheritance_chain",
            "analyze_impact",
            "get_tailored_guidance",
        ] {
            assert!(names.contains(&expected.to_string()), "missing tool {expected}");
        }
    }

    #[tokio::test]
    async fn unknown_tool_renders_as_error_markdown_not_a_panic() {
        let md = gateway()
            .dispatch("no_such_tool", "7.10.2", serde_json::json!({}))
            .await;
        assert!(md.contains("Invalid Argument"));
    }

    #[tokio::test]
    async fn missing_version_renders_as_error_markdown() {
        let md = gateway()
            .dispatch("search_code", "9.0.0", serde_json::json!({ "query": "Foo" }))
            .await;
        assert!(md.contains("Version Unavailable"));
    }
}
