//! `list_projects` / `get_project_structure` — built on
//! [`super::super::store::DocumentStore::list_projects`] and `find` plus a
//! client-side grouping-by-kind step.

use crate::error::EngineResult;
use crate::model::{GraphNode, NodeKind};
use crate::store::{require_version, DocumentStore, NodeFilter, ProjectSummary};
use std::collections::BTreeMap;

pub async fn list_projects(
    store: &dyn DocumentStore,
    version: &str,
    query: Option<&str>,
    limit: usize,
) -> EngineResult<Vec<ProjectSummary>> {
    require_version(store, version).await?;
    store.list_projects(version, query, limit).await
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProjectStructure {
    pub found: bool,
    pub project: String,
    pub total: usize,
    /// Grouped by `kind`, sorted by kind name for deterministic rendering.
    pub by_kind: BTreeMap<String, Vec<GraphNode>>,
    pub reason: Option<String>,
}

pub async fn get_project_structure(
    store: &dyn DocumentStore,
    version: &str,
    project: &str,
    kind: Option<NodeKind>,
    limit: usize,
) -> EngineResult<ProjectStructure> {
    require_version(store, version).await?;
    let filter = NodeFilter {
        kind,
        project_contains_ci: Some(project.to_string()),
        ..Default::default()
    };
    let nodes = store.find(version, &filter, Some(limit)).await?;

    if nodes.is_empty() {
        return Ok(ProjectStructure {
            found: false,
            project: project.to_string(),
            total: 0,
            by_kind: BTreeMap::new(),
            reason: Some(format!("no elements found in project `{project}`")),
        });
    }

    let mut by_kind: BTreeMap<String, Vec<GraphNode>> = BTreeMap::new();
    let total = nodes.len();
    for node in nodes {
        by_kind.entry(node.kind.to_string()).or_default().push(node);
    }

    Ok(ProjectStructure {
        found: true,
        project: project.to_string(),
        total,
        by_kind,
        reason: None,
    })
}
