//! Environment-driven configuration (spec §6).
//!
//! No external config-file crate: a handful of settings read straight from
//! `std::env` with typed defaults doesn't earn a config-file dependency.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub store_connection_string: String,
    pub store_database: String,

    pub cache_host: String,
    pub cache_port: u16,
    pub cache_password: Option<String>,
    pub cache_db: i64,
    pub cache_default_ttl: Duration,
    pub cache_enabled: bool,

    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,

    pub log_level: String,
    pub default_version: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let cache_ttl_seconds: u64 = env_parsed("CACHE_DEFAULT_TTL_SECONDS", 24 * 60 * 60);

        Config {
            store_connection_string: env_or(
                "STORE_CONNECTION_STRING",
                "mongodb://localhost:27017",
            ),
            store_database: env_or("STORE_DATABASE", "codegraph"),

            cache_host: env_or("CACHE_HOST", "localhost"),
            cache_port: env_parsed("CACHE_PORT", 6379),
            cache_password: env::var("CACHE_PASSWORD").ok().filter(|s| !s.is_empty()),
            cache_db: env_parsed("CACHE_DB", 0),
            cache_default_ttl: Duration::from_secs(cache_ttl_seconds),
            cache_enabled: env_parsed("CACHE_ENABLED", true),

            server_host: env_or("SERVER_HOST", "0.0.0.0"),
            server_port: env_parsed("SERVER_PORT", 8080),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),

            log_level: env_or("LOG_LEVEL", "info"),
            default_version: env::var("DEFAULT_GRAPH_VERSION").ok(),
        }
    }

    /// URL Redis would expect, including db index and optional password.
    pub fn cache_url(&self) -> String {
        match &self.cache_password {
            Some(pass) => format!(
                "redis://:{pass}@{host}:{port}/{db}",
                pass = pass,
                host = self.cache_host,
                port = self.cache_port,
                db = self.cache_db
            ),
            None => format!(
                "redis://{host}:{port}/{db}",
                host = self.cache_host,
                port = self.cache_port,
                db = self.cache_db
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_url_without_password() {
        let cfg = Config {
            store_connection_string: String::new(),
            store_database: String::new(),
            cache_host: "localhost".into(),
            cache_port: 6379,
            cache_password: None,
            cache_db: 0,
            cache_default_ttl: Duration::from_secs(1),
            cache_enabled: true,
            server_host: String::new(),
            server_port: 0,
            cors_origins: vec![],
            log_level: String::new(),
            default_version: None,
        };
        assert_eq!(cfg.cache_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn cache_url_with_password() {
        let mut cfg = Config {
            store_connection_string: String::new(),
            store_database: String::new(),
            cache_host: "localhost".into(),
            cache_port: 6379,
            cache_password: Some("secret".into()),
            cache_db: 2,
            cache_default_ttl: Duration::from_secs(1),
            cache_enabled: true,
            server_host: String::new(),
            server_port: 0,
            cors_origins: vec![],
            log_level: String::new(),
            default_version: None,
        };
        assert_eq!(cfg.cache_url(), "redis://:secret@localhost:6379/2");
        cfg.cache_password = None;
        assert_eq!(cfg.cache_url(), "redis://localhost:6379/2");
    }
}
