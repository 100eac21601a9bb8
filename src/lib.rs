//! Versioned code-graph query engine and tool gateway.
//!
//! One MongoDB collection per semver version holds a snapshot of a
//! statically-analyzed codebase as [`model::GraphNode`] documents. This
//! crate exposes read-only search, traversal, impact-analysis, and
//! catalog operations over that snapshot through three surfaces that all
//! funnel through the same [`query::NodeQueryService`]: a tool gateway
//! (spec §4.6) consumed over JSON-RPC/SSE, a REST API (spec §4.7), and — in
//! tests — direct calls against [`store::MemoryDocumentStore`].

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guidance;
pub mod http;
pub mod impact;
pub mod model;
pub mod query;
pub mod render;
pub mod sse;
pub mod store;

use cache::backend::{CacheBackend, NullBackend, RedisBackend};
use cache::CacheClient;
use config::Config;
use gateway::ToolGateway;
use guidance::{GuidanceProvider, NullGuidanceProvider};
use query::NodeQueryService;
use sse::SseSessions;
use std::sync::Arc;
use store::{DocumentStore, MongoDocumentStore};
use tracing::{info, warn};

/// Process-wide application state (spec §5 "Process-wide state"): one
/// store-client handle, one cache-client handle, one immutable tool
/// registry, all built once at startup and shared behind `Arc` across every
/// request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub cache: Arc<CacheClient>,
    pub query: Arc<NodeQueryService>,
    pub gateway: Arc<ToolGateway>,
    pub config: Arc<Config>,
    pub sse: Arc<SseSessions>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<CacheClient>,
        guidance: Arc<dyn GuidanceProvider>,
        config: Config,
    ) -> Self {
        let query = Arc::new(NodeQueryService::new(store.clone(), cache.clone()));
        let gateway = Arc::new(ToolGateway::new(query.clone(), guidance));
        Self {
            store,
            cache,
            query,
            gateway,
            config: Arc::new(config),
            sse: Arc::new(SseSessions::new()),
        }
    }

    /// Resolve the version to operate on: an explicit request value, else
    /// the configured default, else an `InvalidArgument` (spec §6's
    /// "default graph version" is optional, not guaranteed).
    pub fn resolve_version(&self, requested: Option<&str>) -> error::EngineResult<String> {
        requested
            .map(str::to_string)
            .or_else(|| self.config.default_version.clone())
            .ok_or_else(|| {
                error::EngineError::InvalidArgument(
                    "no version specified and no default configured".to_string(),
                )
            })
    }
}

/// Connect the store and cache backends named by `config` (spec §6 startup
/// sequence). `anyhow` is used here, at the process boundary, for
/// startup/shutdown glue; library code below this point returns
/// `EngineError` instead.
pub async fn connect(config: &Config) -> anyhow::Result<(Arc<dyn DocumentStore>, Arc<CacheClient>)> {
    let store = MongoDocumentStore::connect(&config.store_connection_string, &config.store_database)
        .await?;
    info!(database = %config.store_database, "connected to document store");

    let cache_backend: Arc<dyn CacheBackend> = if config.cache_enabled {
        match RedisBackend::connect(&config.cache_url()).await {
            Ok(backend) => {
                info!(host = %config.cache_host, port = config.cache_port, "connected to cache");
                Arc::new(backend)
            }
            Err(e) => {
                warn!(error = %e, "cache connection failed at startup, degrading to no-op cache");
                Arc::new(NullBackend)
            }
        }
    } else {
        Arc::new(NullBackend)
    };

    let cache = Arc::new(CacheClient::new(cache_backend, config.cache_default_ttl));
    Ok((Arc::new(store), cache))
}

pub fn default_guidance_provider() -> Arc<dyn GuidanceProvider> {
    Arc::new(NullGuidanceProvider)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
