//! Statistics and SemanticStats (spec §4.3.4).

use crate::error::EngineResult;
use crate::store::{require_version, DocumentStore, KindCounts, SemanticCounts};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Statistics {
    pub version: String,
    pub total_nodes: u64,
    pub by_kind: std::collections::HashMap<String, u64>,
    pub distinct_projects: u64,
    pub distinct_solutions: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SemanticStats {
    pub version: String,
    pub calls: u64,
    pub calls_via: u64,
    pub implements: u64,
    pub inherits: u64,
    pub uses: u64,
    pub contains: u64,
    pub class_count: u64,
    pub interface_count: u64,
}

pub async fn statistics(store: &dyn DocumentStore, version: &str) -> EngineResult<Statistics> {
    require_version(store, version).await?;
    let KindCounts {
        by_kind,
        distinct_projects,
        distinct_solutions,
        total,
    } = store.kind_counts(version).await?;
    Ok(Statistics {
        version: version.to_string(),
        total_nodes: total,
        by_kind,
        distinct_projects,
        distinct_solutions,
    })
}

pub async fn semantic_stats(
    store: &dyn DocumentStore,
    version: &str,
) -> EngineResult<SemanticStats> {
    require_version(store, version).await?;
    let SemanticCounts {
        calls,
        calls_via,
        implements,
        inherits,
        uses,
        contains,
        class_count,
        interface_count,
    } = store.semantic_counts(version).await?;
    Ok(SemanticStats {
        version: version.to_string(),
        calls,
        calls_via,
        implements,
        inherits,
        uses,
        contains,
        class_count,
        interface_count,
    })
}
