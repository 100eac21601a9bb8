//! The two-phase search ranker (spec §4.3.1).
//!
//! Exact-first is a hard contract: if an exact case-insensitive `name` match
//! exists, partial matches are never mixed in, even if the exact phase's own
//! post-filters (`containingClass`, `layer`) whittle it down to nothing.

use crate::error::EngineResult;
use crate::model::{containing_class_of, last_segment_of, GraphNode, NodeKind};
use crate::store::{require_version, DocumentStore, NodeFilter};

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub kind: Option<NodeKind>,
    pub solution: Option<String>,
    pub project: Option<String>,
    pub limit: usize,
    pub exact_first: bool,
    pub containing_class: Option<String>,
    pub layer: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<GraphNode>,
    pub exact_match: bool,
    /// The token actually searched for, after whitespace trimming and
    /// first-token reduction.
    pub query_used: String,
    /// True when `query_used` differs from the caller's original string.
    pub query_modified: bool,
}

/// Trim and reduce a multi-word query to its first whitespace-separated
/// token, reporting whether anything changed (spec §4.3.1, §8 boundary
/// behavior).
fn normalize_query(query: &str) -> (String, bool) {
    let trimmed = query.trim();
    let first_token = trimmed.split_whitespace().next().unwrap_or("");
    (first_token.to_string(), first_token != query)
}

fn containing_class_short_name(full_name: &str) -> Option<&str> {
    containing_class_of(full_name).map(last_segment_of)
}

fn layer_matches(node: &GraphNode, layer: &str) -> bool {
    let layer = layer.to_lowercase();
    if let Some(l) = &node.layer {
        if l.to_lowercase() == layer {
            return true;
        }
    }
    let in_namespace = node
        .namespace
        .as_deref()
        .is_some_and(|n| n.to_lowercase().contains(&layer));
    let in_project = node
        .project
        .as_deref()
        .is_some_and(|p| p.to_lowercase().contains(&layer));
    in_namespace || in_project
}

/// Apply the two optional post-filters the service accepts beyond the base
/// kind/solution/project filter.
fn apply_post_filters(nodes: Vec<GraphNode>, params: &SearchParams) -> Vec<GraphNode> {
    let mut out = nodes;
    if let Some(class) = &params.containing_class {
        out.retain(|n| {
            containing_class_short_name(&n.full_name)
                .is_some_and(|c| c.eq_ignore_ascii_case(class))
        });
    }
    if let Some(layer) = &params.layer {
        out.retain(|n| layer_matches(n, layer));
    }
    out
}

pub async fn search(
    store: &dyn DocumentStore,
    version: &str,
    params: &SearchParams,
) -> EngineResult<SearchOutcome> {
    require_version(store, version).await?;

    let (token, query_modified) = normalize_query(&params.query);

    let base = NodeFilter {
        kind: params.kind,
        solution_contains_ci: params.solution.clone(),
        project_contains_ci: params.project.clone(),
        ..Default::default()
    };

    if !token.is_empty() {
        let exact_filter = NodeFilter {
            name_exact_ci: Some(token.clone()),
            ..base.clone()
        };
        let exact_raw = store.find(version, &exact_filter, None).await?;
        if !exact_raw.is_empty() {
            let mut filtered = apply_post_filters(exact_raw, params);
            filtered.truncate(params.limit);
            return Ok(SearchOutcome {
                results: filtered,
                exact_match: true,
                query_used: token,
                query_modified,
            });
        }
    }

    if token.is_empty() || !params.exact_first {
        return Ok(SearchOutcome {
            results: vec![],
            exact_match: false,
            query_used: token,
            query_modified,
        });
    }

    let partial_filter = NodeFilter {
        name_or_full_name_contains_ci: Some(token.clone()),
        ..base
    };
    let partial_raw = store.find(version, &partial_filter, None).await?;
    let mut filtered = apply_post_filters(partial_raw, params);
    filtered.truncate(params.limit);

    Ok(SearchOutcome {
        results: filtered,
        exact_match: false,
        query_used: token,
        query_modified,
    })
}
