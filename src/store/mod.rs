//! Document Store Client (spec §4.1).
//!
//! The sole component that knows the collection-naming convention
//! (`nodes_<version with '.' replaced by '_'>`). All reads are scoped to
//! exactly one version; no query ever spans collections.

pub mod memory;
pub mod mongo;

use crate::error::{EngineError, EngineResult};
use crate::model::{ArrayField, GraphNode, NodeKind};
use async_trait::async_trait;

pub use memory::MemoryDocumentStore;
pub use mongo::MongoDocumentStore;

/// Turn a dotted version tag into its collection name: `7.10.2` -> `nodes_7_10_2`.
pub fn collection_name(version: &str) -> String {
    format!("nodes_{}", version.replace('.', "_"))
}

/// Inverse of [`collection_name`]: `nodes_7_10_2` -> `7.10.2`. Returns `None`
/// for names that don't follow the convention.
pub fn version_from_collection(name: &str) -> Option<String> {
    name.strip_prefix("nodes_").map(|rest| rest.replace('_', "."))
}

/// Composable read filter. Every `Some` field is ANDed together; absent
/// fields impose no constraint, so a handler builds exactly the conditions
/// it needs instead of threading a query-dict through ad hoc call sites.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub kind: Option<NodeKind>,
    pub ids_in: Option<Vec<String>>,
    /// Exact, case-insensitive match on `name`.
    pub name_exact_ci: Option<String>,
    /// Exact, case-insensitive match on `fullName` — used by Impact Analysis
    /// to resolve a method's containing class/interface node (spec §4.4).
    pub full_name_exact_ci: Option<String>,
    /// Substring, case-insensitive match against `name` OR `fullName`.
    pub name_or_full_name_contains_ci: Option<String>,
    pub solution_contains_ci: Option<String>,
    pub project_contains_ci: Option<String>,
    /// A relationship array that must contain the given target id —
    /// the reverse-edge lookup underlying every traversal.
    pub array_contains: Option<(ArrayField, String)>,
}

impl NodeFilter {
    pub fn matches(&self, node: &GraphNode) -> bool {
        if let Some(kind) = self.kind {
            if node.kind != kind {
                return false;
            }
        }
        if let Some(ids) = &self.ids_in {
            if !ids.iter().any(|id| id == &node.id) {
                return false;
            }
        }
        if let Some(name) = &self.name_exact_ci {
            if !node.name.eq_ignore_ascii_case(name) {
                return false;
            }
        }
        if let Some(full_name) = &self.full_name_exact_ci {
            if !node.full_name.eq_ignore_ascii_case(full_name) {
                return false;
            }
        }
        if let Some(needle) = &self.name_or_full_name_contains_ci {
            let needle = needle.to_lowercase();
            let hit = node.name.to_lowercase().contains(&needle)
                || node.full_name.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(needle) = &self.solution_contains_ci {
            let needle = needle.to_lowercase();
            match &node.solution {
                Some(s) if s.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        if let Some(needle) = &self.project_contains_ci {
            let needle = needle.to_lowercase();
            match &node.project {
                Some(p) if p.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        if let Some((field, target)) = &self.array_contains {
            if !node.array_field(*field).iter().any(|id| id == target) {
                return false;
            }
        }
        true
    }
}

/// Aggregate counters backing `Statistics` (spec §4.3.4).
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct KindCounts {
    pub by_kind: std::collections::HashMap<String, u64>,
    pub distinct_projects: u64,
    pub distinct_solutions: u64,
    pub total: u64,
}

/// One row of the `list_projects` catalog op.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub node_count: u64,
    pub solutions: Vec<String>,
}

/// Aggregate edge-array sizes backing `SemanticStats` (spec §4.3.4).
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SemanticCounts {
    pub calls: u64,
    pub calls_via: u64,
    pub implements: u64,
    pub inherits: u64,
    pub uses: u64,
    pub contains: u64,
    pub class_count: u64,
    pub interface_count: u64,
}

/// Read-only access to one version's collection of graph nodes.
///
/// Every method takes `version` explicitly and resolves the collection once;
/// a `VersionUnavailable` error is the only error path out of this trait —
/// "not found" for an individual node is expressed as `Ok(None)`, since it is
/// an expected outcome, not a store failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List versions by enumerating collections matching `nodes_*`.
    async fn list_versions(&self) -> EngineResult<Vec<String>>;

    /// Whether `nodes_<version>` exists and is non-empty.
    async fn version_exists(&self, version: &str) -> EngineResult<bool>;

    async fn find_one(&self, version: &str, id: &str) -> EngineResult<Option<GraphNode>>;

    async fn find_by_ids(&self, version: &str, ids: &[String]) -> EngineResult<Vec<GraphNode>>;

    async fn find(
        &self,
        version: &str,
        filter: &NodeFilter,
        limit: Option<usize>,
    ) -> EngineResult<Vec<GraphNode>>;

    async fn count(&self, version: &str, filter: &NodeFilter) -> EngineResult<u64>;

    async fn kind_counts(&self, version: &str) -> EngineResult<KindCounts>;

    async fn semantic_counts(&self, version: &str) -> EngineResult<SemanticCounts>;

    /// Distinct `project` values with node counts and the set of solutions
    /// each project appears under. `query` narrows to project names
    /// containing it, case-insensitively.
    async fn list_projects(
        &self,
        version: &str,
        query: Option<&str>,
        limit: usize,
    ) -> EngineResult<Vec<ProjectSummary>>;
}

/// Shared guard every operation runs first: resolve `version` to a
/// confirmed-present collection, or fail with the full version list.
pub async fn require_version(store: &dyn DocumentStore, version: &str) -> EngineResult<()> {
    if store.version_exists(version).await? {
        Ok(())
    } else {
        let available = store.list_versions().await.unwrap_or_default();
        Err(EngineError::VersionUnavailable {
            requested: version.to_string(),
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_replaces_dots() {
        assert_eq!(collection_name("7.10.2"), "nodes_7_10_2");
    }

    #[test]
    fn version_from_collection_is_inverse() {
        assert_eq!(
            version_from_collection("nodes_7_10_2"),
            Some("7.10.2".to_string())
        );
        assert_eq!(version_from_collection("other_thing"), None);
    }

    #[test]
    fn filter_matches_is_conjunctive() {
        let node = crate::model::fixtures::node(
            "graph:method/p/Ns.C.M",
            "M",
            "Ns.C.M",
            NodeKind::Method,
        );
        let mut filter = NodeFilter {
            kind: Some(NodeKind::Method),
            name_exact_ci: Some("m".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&node));
        filter.kind = Some(NodeKind::Class);
        assert!(!filter.matches(&node));
    }
}
