//! Engine-wide error taxonomy (spec §7).
//!
//! `CacheUnavailable` deliberately has no variant here: a cache failure is
//! logged and swallowed inside the cache client, never surfaced as an
//! `Err` from a query operation.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("version `{requested}` is not available")]
    VersionUnavailable {
        requested: String,
        available: Vec<String>,
    },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Short machine-stable tag, echoed in Markdown error blocks and HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::VersionUnavailable { .. } => "VersionUnavailable",
            EngineError::NodeNotFound(_) => "NodeNotFound",
            EngineError::InvalidArgument(_) => "InvalidArgument",
            EngineError::StoreUnavailable(_) => "StoreUnavailable",
            EngineError::Timeout(_) => "Timeout",
            EngineError::Internal(_) => "Internal",
        }
    }
}
