//! Typed per-tool argument structs (spec §4.6). Each is deserialized from
//! the raw `serde_json::Value` a JSON-RPC `tools/call` or gateway dispatch
//! carries; a deserialization failure becomes `EngineError::InvalidArgument`
//! rather than a panic or an opaque JSON error.

use crate::error::{EngineError, EngineResult};
use serde::Deserialize;
use serde_json::Value;

fn parse<T: for<'de> Deserialize<'de>>(tool: &str, args: Value) -> EngineResult<T> {
    serde_json::from_value(args)
        .map_err(|e| EngineError::InvalidArgument(format!("{tool}: invalid arguments ({e})")))
}

#[derive(Debug, Deserialize)]
pub struct SearchCodeArgs {
    pub query: String,
    pub kind: Option<String>,
    pub solution: Option<String>,
    pub project: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(rename = "exactFirst", default = "default_true")]
    pub exact_first: bool,
    #[serde(rename = "containingClass")]
    pub containing_class: Option<String>,
    pub layer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetCodeContextArgs {
    #[serde(rename = "className")]
    pub class_name: String,
    #[serde(rename = "methodName")]
    pub method_name: Option<String>,
    pub namespace: Option<String>,
    pub project: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsArgs {
    pub query: Option<String>,
    #[serde(default = "default_catalog_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct GetProjectStructureArgs {
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "nodeType")]
    pub node_type: Option<String>,
    #[serde(default = "default_structure_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct GetStatisticsArgs {
    #[serde(default)]
    pub semantic: bool,
}

#[derive(Debug, Deserialize)]
pub struct FindImplementationsArgs {
    #[serde(rename = "interfaceOrClass")]
    pub interface_or_class: String,
}

#[derive(Debug, Deserialize)]
pub struct FindCallersArgs {
    #[serde(rename = "targetId")]
    pub target_id: String,
    #[serde(rename = "maxDepth", default = "default_depth")]
    pub max_depth: u32,
    #[serde(rename = "includeIndirect", default = "default_true")]
    pub include_indirect: bool,
}

#[derive(Debug, Deserialize)]
pub struct FindCalleesArgs {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "maxDepth", default = "default_depth")]
    pub max_depth: u32,
    #[serde(rename = "includeViaInterface", default = "default_true")]
    pub include_via_interface: bool,
}

#[derive(Debug, Deserialize)]
pub struct FindInheritanceChainArgs {
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "maxDepth", default = "default_depth")]
    pub max_depth: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeImpactArgs {
    #[serde(rename = "nodeId")]
    pub node_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GetTailoredGuidanceArgs {
    #[serde(rename = "taskType")]
    pub task_type: String,
    #[serde(rename = "componentName")]
    pub component_name: Option<String>,
    pub layer: Option<String>,
    #[serde(default = "default_step")]
    pub step: String,
}

fn default_limit() -> usize {
    20
}
fn default_catalog_limit() -> usize {
    50
}
fn default_structure_limit() -> usize {
    1000
}
fn default_depth() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_step() -> String {
    "overview".to_string()
}

macro_rules! parse_args {
    ($name:ident, $ty:ty) => {
        pub fn $name(tool: &str, args: Value) -> EngineResult<$ty> {
            parse(tool, args)
        }
    };
}

parse_args!(search_code, SearchCodeArgs);
parse_args!(get_code_context, GetCodeContextArgs);
parse_args!(list_projects, ListProjectsArgs);
parse_args!(get_project_structure, GetProjectStructureArgs);
parse_args!(get_statistics, GetStatisticsArgs);
parse_args!(find_implementations, FindImplementationsArgs);
parse_args!(find_callers, FindCallersArgs);
parse_args!(find_callees, FindCalleesArgs);
parse_args!(find_inheritance_chain, FindInheritanceChainArgs);
parse_args!(analyze_impact, AnalyzeImpactArgs);
parse_args!(get_tailored_guidance, GetTailoredGuidanceArgs);
