//! Tool catalog (spec §4.6) — one struct per tool, each wrapping the shared
//! [`NodeQueryService`]/[`GuidanceProvider`] and rendering its own result.
//! Every tool implements `GatewayTool` (name/description/
//! parameters-as-JSON-schema/execute) and parses its arguments into the
//! typed `gateway::args` structs before doing anything else.

use super::GatewayTool;
use crate::error::{EngineError, EngineResult};
use crate::guidance::{GuidanceProvider, GuidanceRequest};
use crate::impact;
use crate::model::NodeKind;
use crate::query::{search::SearchParams, NodeQueryService};
use crate::render;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;

use super::args;

fn parse_kind(tool: &str, raw: &Option<String>) -> EngineResult<Option<NodeKind>> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => NodeKind::from_str(s)
            .map(Some)
            .map_err(|_| EngineError::InvalidArgument(format!("{tool}: unknown kind `{s}`"))),
    }
}

pub struct SearchCodeTool {
    query: Arc<NodeQueryService>,
}

impl SearchCodeTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for SearchCodeTool {
    fn name(&self) -> &'static str {
        "search_code"
    }

    fn description(&self) -> &'static str {
        "Ranked search over the code graph with optional layer/class/project post-filters."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "kind": {"type": "string"},
                "solution": {"type": "string"},
                "project": {"type": "string"},
                "limit": {"type": "integer", "default": 20},
                "exactFirst": {"type": "boolean", "default": true},
                "containingClass": {"type": "string"},
                "layer": {"type": "string"},
            },
            "required": ["query"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::search_code(self.name(), args)?;
        let kind = parse_kind(self.name(), &a.kind)?;
        let outcome = self
            .query
            .search(
                version,
                SearchParams {
                    query: a.query,
                    kind,
                    solution: a.solution,
                    project: a.project,
                    limit: a.limit,
                    exact_first: a.exact_first,
                    containing_class: a.containing_class,
                    layer: a.layer,
                },
            )
            .await?;
        Ok(render::search::render(version, &outcome))
    }
}

pub struct GetCodeContextTool {
    query: Arc<NodeQueryService>,
}

impl GetCodeContextTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for GetCodeContextTool {
    fn name(&self) -> &'static str {
        "get_code_context"
    }

    fn description(&self) -> &'static str {
        "Renders a class (or one of its methods) with its direct inbound callers, outbound \
         calls, uses, implements, and inherits."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "className": {"type": "string"},
                "methodName": {"type": "string"},
                "namespace": {"type": "string"},
                "project": {"type": "string"},
            },
            "required": ["className"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::get_code_context(self.name(), args)?;
        let target_name = a.method_name.clone().unwrap_or_else(|| a.class_name.clone());

        let outcome = self
            .query
            .search(
                version,
                SearchParams {
                    query: target_name,
                    project: a.project,
                    containing_class: a.method_name.as_ref().map(|_| a.class_name.clone()),
                    limit: 5,
                    exact_first: true,
                    ..Default::default()
                },
            )
            .await?;

        let ctx = match outcome.results.into_iter().next() {
            None => render::context::CodeContext {
                found: false,
                target: None,
                inbound_callers: vec![],
                outbound_calls: vec![],
                uses: vec![],
                implements: vec![],
                inherits: vec![],
                reason: Some(format!("no node matching `{}` found", a.class_name)),
            },
            Some(target) => {
                let store = self.query.store();
                let callers = self
                    .query
                    .find_callers(version, &target.id, 1, false)
                    .await?;
                let callees = self
                    .query
                    .find_callees(version, &target.id, 1, false)
                    .await?;
                let uses = store.find_by_ids(version, &target.uses).await?;
                let implements = store.find_by_ids(version, &target.implements).await?;
                let inherits = store.find_by_ids(version, &target.inherits).await?;
                render::context::CodeContext {
                    found: true,
                    inbound_callers: callers.callers.into_iter().map(|d| d.node).collect(),
                    outbound_calls: callees.callees.into_iter().map(|d| d.node).collect(),
                    target: Some(target),
                    uses,
                    implements,
                    inherits,
                    reason: None,
                }
            }
        };

        Ok(render::context::render(version, &ctx))
    }
}

pub struct ListProjectsTool {
    query: Arc<NodeQueryService>,
}

impl ListProjectsTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for ListProjectsTool {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        "Lists projects present in the graph, with node counts and owning solutions."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "default": 50},
            },
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::list_projects(self.name(), args)?;
        let projects = self.query.list_projects(version, a.query, a.limit).await?;
        Ok(render::catalog::render_projects(version, &projects))
    }
}

pub struct GetProjectStructureTool {
    query: Arc<NodeQueryService>,
}

impl GetProjectStructureTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for GetProjectStructureTool {
    fn name(&self) -> &'static str {
        "get_project_structure"
    }

    fn description(&self) -> &'static str {
        "Lists every node in a project, grouped by kind."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "projectId": {"type": "string"},
                "nodeType": {"type": "string"},
                "limit": {"type": "integer", "default": 1000},
            },
            "required": ["projectId"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::get_project_structure(self.name(), args)?;
        let kind = parse_kind(self.name(), &a.node_type)?;
        let structure = self
            .query
            .get_project_structure(version, &a.project_id, kind, a.limit)
            .await?;
        Ok(render::catalog::render_project_structure(version, &structure))
    }
}

pub struct GetStatisticsTool {
    query: Arc<NodeQueryService>,
}

impl GetStatisticsTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for GetStatisticsTool {
    fn name(&self) -> &'static str {
        "get_statistics"
    }

    fn description(&self) -> &'static str {
        "Node-kind and relationship-edge counts for a graph version."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "semantic": {"type": "boolean", "default": false},
            },
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::get_statistics(self.name(), args)?;
        if a.semantic {
            let stats = self.query.semantic_stats(version).await?;
            Ok(render::catalog::render_semantic_stats(&stats))
        } else {
            let stats = self.query.statistics(version).await?;
            Ok(render::catalog::render_statistics(&stats))
        }
    }
}

pub struct FindImplementationsTool {
    query: Arc<NodeQueryService>,
}

impl FindImplementationsTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for FindImplementationsTool {
    fn name(&self) -> &'static str {
        "find_implementations"
    }

    fn description(&self) -> &'static str {
        "Finds the classes implementing an interface."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "interfaceOrClass": {"type": "string"} },
            "required": ["interfaceOrClass"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::find_implementations(self.name(), args)?;
        let result = self
            .query
            .find_implementations(version, &a.interface_or_class)
            .await?;
        Ok(render::implementations::render(version, &result))
    }
}

pub struct FindCallersTool {
    query: Arc<NodeQueryService>,
}

impl FindCallersTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for FindCallersTool {
    fn name(&self) -> &'static str {
        "find_callers"
    }

    fn description(&self) -> &'static str {
        "Finds direct and interface-dispatched callers of a method, bounded by depth."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "targetId": {"type": "string"},
                "maxDepth": {"type": "integer", "default": 3},
                "includeIndirect": {"type": "boolean", "default": true},
            },
            "required": ["targetId"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::find_callers(self.name(), args)?;
        let result = self
            .query
            .find_callers(version, &a.target_id, a.max_depth, a.include_indirect)
            .await?;
        Ok(render::traversal::render_callers(version, &result))
    }
}

pub struct FindCalleesTool {
    query: Arc<NodeQueryService>,
}

impl FindCalleesTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for FindCalleesTool {
    fn name(&self) -> &'static str {
        "find_callees"
    }

    fn description(&self) -> &'static str {
        "Finds direct and interface-dispatched callees of a method, bounded by depth."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sourceId": {"type": "string"},
                "maxDepth": {"type": "integer", "default": 3},
                "includeViaInterface": {"type": "boolean", "default": true},
            },
            "required": ["sourceId"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::find_callees(self.name(), args)?;
        let result = self
            .query
            .find_callees(version, &a.source_id, a.max_depth, a.include_via_interface)
            .await?;
        Ok(render::traversal::render_callees(version, &result))
    }
}

pub struct FindInheritanceChainTool {
    query: Arc<NodeQueryService>,
}

impl FindInheritanceChainTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for FindInheritanceChainTool {
    fn name(&self) -> &'static str {
        "find_inheritance_chain"
    }

    fn description(&self) -> &'static str {
        "Finds a class's ancestors and descendants, bounded by depth."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "classId": {"type": "string"},
                "maxDepth": {"type": "integer", "default": 3},
            },
            "required": ["classId"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::find_inheritance_chain(self.name(), args)?;
        let result = self
            .query
            .find_inheritance_chain(version, &a.class_id, a.max_depth)
            .await?;
        Ok(render::traversal::render_inheritance(version, &result))
    }
}

pub struct AnalyzeImpactTool {
    query: Arc<NodeQueryService>,
}

impl AnalyzeImpactTool {
    pub fn new(query: Arc<NodeQueryService>) -> Self {
        Self { query }
    }
}

#[async_trait]
impl GatewayTool for AnalyzeImpactTool {
    fn name(&self) -> &'static str {
        "analyze_impact"
    }

    fn description(&self) -> &'static str {
        "Reports the risk of changing a method: affected callers, flows, and layers reached."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "nodeId": {"type": "string"} },
            "required": ["nodeId"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::analyze_impact(self.name(), args)?;
        let result = impact::analyze_impact(self.query.store().as_ref(), version, &a.node_id).await?;
        Ok(render::impact::render(version, &result))
    }
}

pub struct GetTailoredGuidanceTool {
    guidance: Arc<dyn GuidanceProvider>,
}

impl GetTailoredGuidanceTool {
    pub fn new(guidance: Arc<dyn GuidanceProvider>) -> Self {
        Self { guidance }
    }
}

#[async_trait]
impl GatewayTool for GetTailoredGuidanceTool {
    fn name(&self) -> &'static str {
        "get_tailored_guidance"
    }

    fn description(&self) -> &'static str {
        "Stepwise authoring guide for a Tailored development task, delegated to the guidance \
         subsystem."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "taskType": {"type": "string"},
                "componentName": {"type": "string"},
                "layer": {"type": "string"},
                "step": {"type": "string", "default": "overview"},
            },
            "required": ["taskType"],
        })
    }

    async fn execute(&self, version: &str, args: Value) -> EngineResult<String> {
        let a = args::get_tailored_guidance(self.name(), args)?;
        let request = GuidanceRequest {
            task_type: a.task_type,
            component_name: a.component_name,
            layer: a.layer,
            step: a.step,
            version: version.to_string(),
        };
        let content = self.guidance.guidance(&request).await;
        Ok(render::guidance::render(&request, content.as_deref()))
    }
}
