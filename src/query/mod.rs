//! Node Query Service (spec §4.3) — the facade every tool handler and HTTP
//! endpoint calls through. Every operation takes `version` first, resolves
//! the collection once, and runs its result through the cache client.

pub mod catalog;
pub mod search;
pub mod stats;
pub mod traversal;

pub use catalog::ProjectStructure;
pub use search::{SearchOutcome, SearchParams};
pub use stats::{SemanticStats, Statistics};
pub use traversal::{
    CalleesResult, CallersResult, DepthNode, ImplementationsResult, InheritanceResult,
};

use crate::cache::{CacheClient, CacheOp};
use crate::error::{EngineError, EngineResult};
use crate::model::{GraphNode, NodeKind};
use crate::store::{require_version, DocumentStore, NodeFilter, ProjectSummary};
use std::sync::Arc;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClassMembersResult {
    pub found: bool,
    pub class: Option<GraphNode>,
    pub methods: Vec<GraphNode>,
    pub properties: Vec<GraphNode>,
    pub fields: Vec<GraphNode>,
    pub count: usize,
    pub reason: Option<String>,
}

pub struct NodeQueryService {
    store: Arc<dyn DocumentStore>,
    cache: Arc<CacheClient>,
}

impl NodeQueryService {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<CacheClient>) -> Self {
        Self { store, cache }
    }

    pub async fn list_versions(&self) -> EngineResult<Vec<String>> {
        let store = self.store.clone();
        self.cache
            .get_or_compute(CacheOp::ListVersions, "-", &[], || async move {
                store.list_versions().await
            })
            .await
    }

    pub async fn search(&self, version: &str, params: SearchParams) -> EngineResult<SearchOutcome> {
        let args: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("kind", params.kind.map(|k| k.to_string()).unwrap_or_default()),
            ("solution", params.solution.clone().unwrap_or_default()),
            ("project", params.project.clone().unwrap_or_default()),
            ("limit", params.limit.to_string()),
            ("exactFirst", params.exact_first.to_string()),
            (
                "containingClass",
                params.containing_class.clone().unwrap_or_default(),
            ),
            ("layer", params.layer.clone().unwrap_or_default()),
        ];
        let store = self.store.clone();
        let version = version.to_string();
        self.cache
            .get_or_compute(CacheOp::SearchCode, &version, &args, move || async move {
                search::search(store.as_ref(), &version, &params).await
            })
            .await
    }

    pub async fn get_by_id(&self, version: &str, id: &str) -> EngineResult<Option<GraphNode>> {
        require_version(self.store.as_ref(), version).await?;
        let args = [("id", id.to_string())];
        let store = self.store.clone();
        let (version, id) = (version.to_string(), id.to_string());
        self.cache
            .get_or_compute(CacheOp::GetById, &version, &args, move || async move {
                store.find_one(&version, &id).await
            })
            .await
    }

    pub async fn get_by_project(
        &self,
        version: &str,
        project: &str,
        kind: Option<NodeKind>,
        limit: usize,
    ) -> EngineResult<Vec<GraphNode>> {
        require_version(self.store.as_ref(), version).await?;
        let args = [
            ("project", project.to_string()),
            ("kind", kind.map(|k| k.to_string()).unwrap_or_default()),
            ("limit", limit.to_string()),
        ];
        let store = self.store.clone();
        let (version, project) = (version.to_string(), project.to_string());
        self.cache
            .get_or_compute(CacheOp::GetByProject, &version, &args, move || async move {
                let filter = NodeFilter {
                    kind,
                    project_contains_ci: Some(project),
                    ..Default::default()
                };
                store.find(&version, &filter, Some(limit)).await
            })
            .await
    }

    pub async fn get_class_members(
        &self,
        version: &str,
        class_id: &str,
        kinds: Option<Vec<NodeKind>>,
    ) -> EngineResult<ClassMembersResult> {
        require_version(self.store.as_ref(), version).await?;
        let args = [
            ("classId", class_id.to_string()),
            (
                "kinds",
                kinds
                    .as_ref()
                    .map(|ks| {
                        ks.iter()
                            .map(|k| k.to_string())
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .unwrap_or_default(),
            ),
        ];
        let store = self.store.clone();
        let (version, class_id) = (version.to_string(), class_id.to_string());
        self.cache
            .get_or_compute(CacheOp::GetClassMembers, &version, &args, move || async move {
                let Some(class) = store.find_one(&version, &class_id).await? else {
                    return Ok(ClassMembersResult {
                        found: false,
                        class: None,
                        methods: vec![],
                        properties: vec![],
                        fields: vec![],
                        count: 0,
                        reason: Some(format!("class `{class_id}` not found in v{version}")),
                    });
                };
                let members = store.find_by_ids(&version, &class.has_member).await?;
                let members: Vec<GraphNode> = match &kinds {
                    Some(ks) => members.into_iter().filter(|m| ks.contains(&m.kind)).collect(),
                    None => members,
                };
                let methods = members
                    .iter()
                    .filter(|m| m.kind == NodeKind::Method)
                    .cloned()
                    .collect::<Vec<_>>();
                let properties = members
                    .iter()
                    .filter(|m| m.kind == NodeKind::Property)
                    .cloned()
                    .collect::<Vec<_>>();
                let fields = members
                    .iter()
                    .filter(|m| m.kind == NodeKind::Field)
                    .cloned()
                    .collect::<Vec<_>>();
                Ok(ClassMembersResult {
                    found: true,
                    count: members.len(),
                    class: Some(class),
                    methods,
                    properties,
                    fields,
                    reason: None,
                })
            })
            .await
    }

    pub async fn find_callers(
        &self,
        version: &str,
        target_id: &str,
        max_depth: u32,
        include_indirect: bool,
    ) -> EngineResult<CallersResult> {
        let max_depth = validate_depth(max_depth)?;
        let args = [
            ("targetId", target_id.to_string()),
            ("maxDepth", max_depth.to_string()),
            ("includeIndirect", include_indirect.to_string()),
        ];
        let store = self.store.clone();
        let (version, target_id) = (version.to_string(), target_id.to_string());
        self.cache
            .get_or_compute(CacheOp::FindCallers, &version, &args, move || async move {
                traversal::find_callers(store.as_ref(), &version, &target_id, max_depth, include_indirect)
                    .await
            })
            .await
    }

    pub async fn find_callees(
        &self,
        version: &str,
        source_id: &str,
        max_depth: u32,
        include_via_interface: bool,
    ) -> EngineResult<CalleesResult> {
        let max_depth = validate_depth(max_depth)?;
        let args = [
            ("sourceId", source_id.to_string()),
            ("maxDepth", max_depth.to_string()),
            ("includeViaInterface", include_via_interface.to_string()),
        ];
        let store = self.store.clone();
        let (version, source_id) = (version.to_string(), source_id.to_string());
        self.cache
            .get_or_compute(CacheOp::FindCallees, &version, &args, move || async move {
                traversal::find_callees(
                    store.as_ref(),
                    &version,
                    &source_id,
                    max_depth,
                    include_via_interface,
                )
                .await
            })
            .await
    }

    pub async fn find_implementations(
        &self,
        version: &str,
        interface_id: &str,
    ) -> EngineResult<ImplementationsResult> {
        let args = [("interfaceId", interface_id.to_string())];
        let store = self.store.clone();
        let (version, interface_id) = (version.to_string(), interface_id.to_string());
        self.cache
            .get_or_compute(CacheOp::FindImplementations, &version, &args, move || async move {
                traversal::find_implementations(store.as_ref(), &version, &interface_id).await
            })
            .await
    }

    pub async fn find_inheritance_chain(
        &self,
        version: &str,
        class_id: &str,
        max_depth: u32,
    ) -> EngineResult<InheritanceResult> {
        let max_depth = validate_depth(max_depth)?;
        let args = [
            ("classId", class_id.to_string()),
            ("maxDepth", max_depth.to_string()),
        ];
        let store = self.store.clone();
        let (version, class_id) = (version.to_string(), class_id.to_string());
        self.cache
            .get_or_compute(
                CacheOp::FindInheritanceChain,
                &version,
                &args,
                move || async move {
                    traversal::find_inheritance_chain(store.as_ref(), &version, &class_id, max_depth)
                        .await
                },
            )
            .await
    }

    pub async fn list_projects(
        &self,
        version: &str,
        query: Option<String>,
        limit: usize,
    ) -> EngineResult<Vec<ProjectSummary>> {
        let args = [
            ("query", query.clone().unwrap_or_default()),
            ("limit", limit.to_string()),
        ];
        let store = self.store.clone();
        let version_owned = version.to_string();
        self.cache
            .get_or_compute(CacheOp::ListProjects, version, &args, move || async move {
                catalog::list_projects(store.as_ref(), &version_owned, query.as_deref(), limit)
                    .await
            })
            .await
    }

    pub async fn get_project_structure(
        &self,
        version: &str,
        project: &str,
        kind: Option<NodeKind>,
        limit: usize,
    ) -> EngineResult<ProjectStructure> {
        let args = [
            ("project", project.to_string()),
            ("kind", kind.map(|k| k.to_string()).unwrap_or_default()),
            ("limit", limit.to_string()),
        ];
        let store = self.store.clone();
        let (version_owned, project_owned) = (version.to_string(), project.to_string());
        self.cache
            .get_or_compute(
                CacheOp::GetProjectStructure,
                version,
                &args,
                move || async move {
                    catalog::get_project_structure(
                        store.as_ref(),
                        &version_owned,
                        &project_owned,
                        kind,
                        limit,
                    )
                    .await
                },
            )
            .await
    }

    pub async fn statistics(&self, version: &str) -> EngineResult<Statistics> {
        let store = self.store.clone();
        let version_owned = version.to_string();
        self.cache
            .get_or_compute(CacheOp::GetStatistics, version, &[], move || async move {
                stats::statistics(store.as_ref(), &version_owned).await
            })
            .await
    }

    pub async fn semantic_stats(&self, version: &str) -> EngineResult<SemanticStats> {
        let store = self.store.clone();
        let version_owned = version.to_string();
        self.cache
            .get_or_compute(CacheOp::GetSemanticStats, version, &[], move || async move {
                stats::semantic_stats(store.as_ref(), &version_owned).await
            })
            .await
    }

    /// Exposed so other components (impact analyzer, gateway) can share the
    /// same store handle without re-resolving a version themselves.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

/// `maxDepth` default is 3, hard cap is 10 (spec §4.3.3); callers requesting
/// more get an `InvalidArgument`, not a silently clamped value.
fn validate_depth(max_depth: u32) -> EngineResult<u32> {
    if max_depth > 10 {
        Err(EngineError::InvalidArgument(format!(
            "maxDepth {max_depth} exceeds the cap of 10"
        )))
    } else {
        Ok(max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheClient;
    use crate::model::fixtures::node;
    use crate::store::MemoryDocumentStore;
    use std::time::Duration;

    fn service(store: MemoryDocumentStore) -> NodeQueryService {
        NodeQueryService::new(
            Arc::new(store),
            Arc::new(CacheClient::new(
                Arc::new(crate::cache::backend::NullBackend),
                Duration::from_secs(60),
            )),
        )
    }

    #[tokio::test]
    async fn get_by_id_roundtrips_search_result_id() {
        let store = MemoryDocumentStore::new();
        store.seed(
            "7.10.2",
            vec![node(
                "graph:method/p/Ns.C.M",
                "M",
                "Ns.C.M",
                NodeKind::Method,
            )],
        );
        let svc = service(store);
        let found = svc
            .search(
                "7.10.2",
                SearchParams {
                    query: "M".to_string(),
                    limit: 10,
                    exact_first: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let id = &found.results[0].id;
        let by_id = svc.get_by_id("7.10.2", id).await.unwrap().unwrap();
        assert_eq!(&by_id.id, id);
    }

    #[tokio::test]
    async fn find_callers_rejects_depth_above_cap() {
        let store = MemoryDocumentStore::new();
        store.seed(
            "7.10.2",
            vec![node("graph:method/p/Ns.M", "M", "Ns.M", NodeKind::Method)],
        );
        let svc = service(store);
        let err = svc
            .find_callers("7.10.2", "graph:method/p/Ns.M", 11, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArgument");
    }
}
