//! Graph traversals (spec §4.3.3): bounded-depth BFS over relationship
//! arrays with a visited set, implemented as a portable walk over
//! `DocumentStore::find`/`find_by_ids` rather than a native `$graphLookup`
//! pipeline, so the same traversal code runs against any backend,
//! including the in-memory one used in tests.

use crate::error::EngineResult;
use crate::model::{ArrayField, GraphNode};
use crate::store::{require_version, DocumentStore, NodeFilter};
use std::collections::HashSet;

/// One node reached during a BFS, tagged with the depth at which it was
/// first visited.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DepthNode {
    pub node: GraphNode,
    pub depth: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallersResult {
    pub found: bool,
    pub target: Option<GraphNode>,
    pub callers: Vec<DepthNode>,
    pub indirect_callers: Vec<DepthNode>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CalleesResult {
    pub found: bool,
    pub source: Option<GraphNode>,
    pub callees: Vec<DepthNode>,
    pub via_interface: Vec<DepthNode>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImplementationsResult {
    pub found: bool,
    pub interface: Option<GraphNode>,
    pub implementations: Vec<GraphNode>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InheritanceResult {
    pub found: bool,
    pub class: Option<GraphNode>,
    pub ancestors: Vec<DepthNode>,
    pub descendants: Vec<DepthNode>,
    pub reason: Option<String>,
}

/// Reverse-edge BFS: starting from `start_id`, at each depth find every node
/// whose `field` array contains a node id already visited at `depth - 1`.
/// Dead edges resolve to nothing and are silently skipped; a visited set
/// both dedups and stops cycles.
async fn bfs_reverse(
    store: &dyn DocumentStore,
    version: &str,
    start_id: &str,
    field: ArrayField,
    max_depth: u32,
) -> EngineResult<Vec<DepthNode>> {
    let mut results = Vec::new();
    let mut visited: HashSet<String> = HashSet::from([start_id.to_string()]);
    let mut frontier = vec![start_id.to_string()];

    for depth in 1..=max_depth {
        let mut next_frontier = Vec::new();
        for id in &frontier {
            let filter = NodeFilter {
                array_contains: Some((field, id.clone())),
                ..Default::default()
            };
            let hits = store.find(version, &filter, None).await?;
            for hit in hits {
                if visited.insert(hit.id.clone()) {
                    next_frontier.push(hit.id.clone());
                    results.push(DepthNode { node: hit, depth });
                }
            }
        }
        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    Ok(results)
}

/// Forward-edge BFS: starting from `start_id`'s own `field` array, follow
/// the ids it references, then each of those nodes' `field` arrays in turn.
async fn bfs_forward(
    store: &dyn DocumentStore,
    version: &str,
    start_id: &str,
    field: ArrayField,
    max_depth: u32,
) -> EngineResult<Vec<DepthNode>> {
    let mut results = Vec::new();
    let mut visited: HashSet<String> = HashSet::from([start_id.to_string()]);

    let Some(start_node) = store.find_one(version, start_id).await? else {
        return Ok(results);
    };
    let mut frontier_ids: Vec<String> = start_node.array_field(field).to_vec();

    for depth in 1..=max_depth {
        if frontier_ids.is_empty() {
            break;
        }
        let nodes = store.find_by_ids(version, &frontier_ids).await?;
        let mut next_ids = Vec::new();
        for node in nodes {
            if visited.insert(node.id.clone()) {
                next_ids.extend(node.array_field(field).iter().cloned());
                results.push(DepthNode { node, depth });
            }
        }
        frontier_ids = next_ids;
    }

    Ok(results)
}

pub async fn find_callers(
    store: &dyn DocumentStore,
    version: &str,
    target_id: &str,
    max_depth: u32,
    include_indirect: bool,
) -> EngineResult<CallersResult> {
    require_version(store, version).await?;

    let Some(target) = store.find_one(version, target_id).await? else {
        return Ok(CallersResult {
            found: false,
            target: None,
            callers: vec![],
            indirect_callers: vec![],
            reason: Some(format!("node `{target_id}` not found in v{version}")),
        });
    };

    let callers = bfs_reverse(store, version, target_id, ArrayField::Calls, max_depth).await?;
    let indirect_callers = if include_indirect {
        bfs_reverse(store, version, target_id, ArrayField::IndirectCall, max_depth).await?
    } else {
        vec![]
    };

    Ok(CallersResult {
        found: true,
        target: Some(target),
        callers,
        indirect_callers,
        reason: None,
    })
}

pub async fn find_callees(
    store: &dyn DocumentStore,
    version: &str,
    source_id: &str,
    max_depth: u32,
    include_via_interface: bool,
) -> EngineResult<CalleesResult> {
    require_version(store, version).await?;

    let Some(source) = store.find_one(version, source_id).await? else {
        return Ok(CalleesResult {
            found: false,
            source: None,
            callees: vec![],
            via_interface: vec![],
            reason: Some(format!("node `{source_id}` not found in v{version}")),
        });
    };

    let callees = bfs_forward(store, version, source_id, ArrayField::Calls, max_depth).await?;
    let via_interface = if include_via_interface {
        bfs_forward(store, version, source_id, ArrayField::CallsVia, max_depth).await?
    } else {
        vec![]
    };

    Ok(CalleesResult {
        found: true,
        source: Some(source),
        callees,
        via_interface,
        reason: None,
    })
}

pub async fn find_implementations(
    store: &dyn DocumentStore,
    version: &str,
    interface_id: &str,
) -> EngineResult<ImplementationsResult> {
    require_version(store, version).await?;

    let Some(interface) = store.find_one(version, interface_id).await? else {
        return Ok(ImplementationsResult {
            found: false,
            interface: None,
            implementations: vec![],
            reason: Some(format!("interface `{interface_id}` not found in v{version}")),
        });
    };

    let filter = NodeFilter {
        array_contains: Some((ArrayField::Implements, interface_id.to_string())),
        ..Default::default()
    };
    let implementations = store.find(version, &filter, None).await?;

    Ok(ImplementationsResult {
        found: true,
        interface: Some(interface),
        implementations,
        reason: None,
    })
}

pub async fn find_inheritance_chain(
    store: &dyn DocumentStore,
    version: &str,
    class_id: &str,
    max_depth: u32,
) -> EngineResult<InheritanceResult> {
    require_version(store, version).await?;

    let Some(class) = store.find_one(version, class_id).await? else {
        return Ok(InheritanceResult {
            found: false,
            class: None,
            ancestors: vec![],
            descendants: vec![],
            reason: Some(format!("class `{class_id}` not found in v{version}")),
        });
    };

    let ancestors = bfs_forward(store, version, class_id, ArrayField::Inherits, max_depth).await?;
    let descendants = bfs_reverse(store, version, class_id, ArrayField::Inherits, max_depth).await?;

    Ok(InheritanceResult {
        found: true,
        class: Some(class),
        ancestors,
        descendants,
        reason: None,
    })
}
