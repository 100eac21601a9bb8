//! Cache Client (spec §4.2).
//!
//! Wraps a [`backend::CacheBackend`] with deterministic key derivation and a
//! per-operation TTL policy. A cache miss, a cache error, or the cache being
//! disabled entirely are all indistinguishable to the caller: `get_or_compute`
//! just falls through to `compute`. Nothing here can turn into a query error.

pub mod backend;

use backend::{CacheBackend, CacheStats};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Every cacheable operation, named so the TTL policy table and the key
/// namespace stay in one place instead of scattered string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    ListVersions,
    SearchCode,
    GetCodeContext,
    ListProjects,
    GetProjectStructure,
    GetStatistics,
    GetSemanticStats,
    GetById,
    GetByProject,
    GetClassMembers,
    FindImplementations,
    FindCallers,
    FindCallees,
    FindInheritanceChain,
    AnalyzeImpact,
}

impl CacheOp {
    fn as_str(&self) -> &'static str {
        match self {
            CacheOp::ListVersions => "list_versions",
            CacheOp::SearchCode => "search_code",
            CacheOp::GetCodeContext => "get_code_context",
            CacheOp::ListProjects => "list_projects",
            CacheOp::GetProjectStructure => "get_project_structure",
            CacheOp::GetStatistics => "get_statistics",
            CacheOp::GetSemanticStats => "get_semantic_stats",
            CacheOp::GetById => "get_by_id",
            CacheOp::GetByProject => "get_by_project",
            CacheOp::GetClassMembers => "get_class_members",
            CacheOp::FindImplementations => "find_implementations",
            CacheOp::FindCallers => "find_callers",
            CacheOp::FindCallees => "find_callees",
            CacheOp::FindInheritanceChain => "find_inheritance_chain",
            CacheOp::AnalyzeImpact => "analyze_impact",
        }
    }

    /// TTL policy: cheap/volatile-ish lookups get a short lease, structural
    /// and statistical reads (which only change when a new version is
    /// indexed) get a long one.
    fn default_ttl(&self) -> Duration {
        match self {
            CacheOp::SearchCode
            | CacheOp::GetCodeContext
            | CacheOp::GetById
            | CacheOp::GetByProject
            | CacheOp::GetClassMembers => Duration::from_secs(5 * 60),
            CacheOp::FindCallers
            | CacheOp::FindCallees
            | CacheOp::FindImplementations
            | CacheOp::FindInheritanceChain
            | CacheOp::AnalyzeImpact => Duration::from_secs(15 * 60),
            CacheOp::ListVersions
            | CacheOp::ListProjects
            | CacheOp::GetProjectStructure
            | CacheOp::GetStatistics
            | CacheOp::GetSemanticStats => Duration::from_secs(60 * 60),
        }
    }
}

pub struct CacheClient {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl CacheClient {
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self { backend, default_ttl }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(backend::NullBackend), Duration::from_secs(0))
    }

    /// Build the cache key `app:<op>:v<version>:<digest>`. `version` is
    /// embedded in both the key prefix and the hashed input so that changing
    /// `version` alone always changes the key (spec §8 property 4), even if
    /// every other argument happens to collide.
    fn key(&self, op: CacheOp, version: &str, args: &[(&str, String)]) -> String {
        let mut sorted: Vec<&(&str, String)> = args.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut hasher = Sha256::new();
        hasher.update(version.as_bytes());
        for (name, value) in sorted {
            hasher.update(b"\0");
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        let digest = hasher.finalize();
        format!("app:{}:v{}:{:x}", op.as_str(), version, digest)
    }

    /// Look up a cached JSON value, or compute it and populate the cache.
    /// Any cache failure (backend down, serialization mismatch) degrades to
    /// a plain call to `compute` — it never becomes an `Err`.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        op: CacheOp,
        version: &str,
        args: &[(&str, String)],
        compute: F,
    ) -> crate::error::EngineResult<T>
    where
        T: Serialize + for<'de> serde::Deserialize<'de>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::error::EngineResult<T>>,
    {
        let key = self.key(op, version, args);

        if let Some(raw) = self.backend.get(&key).await {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    trace!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    debug!(error = %e, key, "cached value failed to deserialize, recomputing");
                }
            }
        }

        let value = compute().await?;
        if let Ok(raw) = serde_json::to_string(&value) {
            let ttl = if self.default_ttl.is_zero() {
                op.default_ttl()
            } else {
                self.default_ttl
            };
            self.backend.set(&key, raw, ttl).await;
        }
        Ok(value)
    }

    /// Invalidate every cached entry for one operation, optionally scoped to
    /// a version — used by admin `/cache/clear` and, per spec, nothing else
    /// (this engine never mutates the store, so nothing auto-invalidates).
    pub async fn invalidate(&self, op: Option<CacheOp>, version: Option<&str>) -> u64 {
        let pattern = match (op, version) {
            (Some(op), Some(version)) => format!("app:{}:v{}:*", op.as_str(), version),
            (Some(op), None) => format!("app:{}:*", op.as_str()),
            (None, Some(version)) => format!("app:*:v{}:*", version),
            (None, None) => "app:*".to_string(),
        };
        self.backend.delete_prefix(&pattern).await
    }

    pub async fn stats(&self) -> CacheStats {
        self.backend.stats().await
    }

    /// List cached keys, optionally scoped to a version, for `/cache/keys`.
    pub async fn keys(&self, version: Option<&str>, limit: usize) -> Vec<String> {
        let pattern = match version {
            Some(version) => format!("app:*:v{}:*", version),
            None => "app:*".to_string(),
        };
        self.backend.keys(&pattern, limit).await
    }

    pub async fn is_healthy(&self) -> bool {
        self.backend.is_healthy().await
    }
}
