//! Cache backends (spec §4.2).

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::warn;

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
    /// Delete every key matching a glob `pattern`. Returns the count removed.
    async fn delete_prefix(&self, pattern: &str) -> u64;
    /// List up to `limit` keys matching a glob `pattern`, for `/cache/keys`.
    async fn keys(&self, pattern: &str, limit: usize) -> Vec<String>;
    async fn is_healthy(&self) -> bool;
    /// Best-effort backend stats for `/cache/stats`; `None` fields when unknown.
    async fn stats(&self) -> CacheStats;
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub connected: bool,
    pub key_count: Option<u64>,
    pub used_memory_human: Option<String>,
    pub hits: Option<u64>,
    pub misses: Option<u64>,
}

/// Redis-backed cache: `GET`/`SETEX` for read/write, `SCAN`+`DEL` (never
/// `KEYS`, which blocks the server on a large keyspace) for prefix
/// invalidation, a connection manager that reconnects transparently, and
/// graceful degradation on any transport failure.
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, key, "cache get failed, proceeding as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut conn = self.manager.clone();
        let ttl_seconds = ttl.as_secs().max(1);
        if let Err(e) = conn
            .set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
        {
            warn!(error = %e, key, "cache set failed, ignoring");
        }
    }

    async fn delete_prefix(&self, pattern: &str) -> u64 {
        let mut conn = self.manager.clone();
        let mut cursor: u64 = 0;
        let mut keys: Vec<String> = Vec::new();
        loop {
            let result: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await;
            match result {
                Ok((next, batch)) => {
                    keys.extend(batch);
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                Err(e) => {
                    warn!(error = %e, pattern, "cache scan failed");
                    return 0;
                }
            }
        }
        if keys.is_empty() {
            return 0;
        }
        match conn.del::<_, u64>(&keys).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, pattern, "cache delete failed");
                0
            }
        }
    }

    async fn keys(&self, pattern: &str, limit: usize) -> Vec<String> {
        let mut conn = self.manager.clone();
        let mut cursor: u64 = 0;
        let mut found: Vec<String> = Vec::new();
        loop {
            let result: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await;
            match result {
                Ok((next, batch)) => {
                    found.extend(batch);
                    if next == 0 || found.len() >= limit {
                        break;
                    }
                    cursor = next;
                }
                Err(e) => {
                    warn!(error = %e, pattern, "cache key scan failed");
                    break;
                }
            }
        }
        found.truncate(limit);
        found
    }

    async fn is_healthy(&self) -> bool {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }

    async fn stats(&self) -> CacheStats {
        let mut conn = self.manager.clone();
        let key_count: Option<u64> = conn.dbsize().await.ok();
        let info: Option<String> = redis::cmd("INFO")
            .arg("stats")
            .query_async(&mut conn)
            .await
            .ok();
        let (hits, misses) = match &info {
            Some(text) => (parse_info_field(text, "keyspace_hits"), parse_info_field(text, "keyspace_misses")),
            None => (None, None),
        };
        CacheStats {
            enabled: true,
            connected: self.is_healthy().await,
            key_count,
            used_memory_human: None,
            hits,
            misses,
        }
    }
}

fn parse_info_field(info: &str, field: &str) -> Option<u64> {
    info.lines()
        .find_map(|line| line.strip_prefix(&format!("{field}:")))
        .and_then(|v| v.trim().parse().ok())
}

/// The "cache disabled" backend: every operation is a no-op miss, matching
/// §5's requirement that the cache's absence never fails a request.
pub struct NullBackend;

#[async_trait]
impl CacheBackend for NullBackend {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }
    async fn set(&self, _key: &str, _value: String, _ttl: Duration) {}
    async fn delete_prefix(&self, _pattern: &str) -> u64 {
        0
    }
    async fn keys(&self, _pattern: &str, _limit: usize) -> Vec<String> {
        vec![]
    }
    async fn is_healthy(&self) -> bool {
        false
    }
    async fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: false,
            connected: false,
            ..Default::default()
        }
    }
}
