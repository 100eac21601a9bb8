//! Renderer (spec §4.5): pure functions turning query results into Markdown.
//!
//! Every renderer here is side-effect-free — same input always produces the
//! same Markdown, satisfying the "repeated identical tool calls return
//! byte-identical Markdown" property in spec §8.

pub mod catalog;
pub mod context;
pub mod error;
pub mod guidance;
pub mod impact;
pub mod implementations;
pub mod search;
pub mod traversal;

use crate::model::GraphNode;

const DEFAULT_TRUNCATE: usize = 20;

/// The first non-title line every renderer emits (spec §4.5).
pub fn version_header(version: &str) -> String {
    format!("**Version:** `{version}`\n\n")
}

/// `[filename:line](path:line)` when source location is available, else a
/// plain dash — IDs are always echoed verbatim elsewhere so a caller can
/// feed them back into another tool call.
pub fn file_ref(node: &GraphNode) -> String {
    match &node.source {
        Some(src) => match src.range {
            Some(range) => format!("[{}:{}]({}:{})", src.file, range.start, src.file, range.start),
            None => format!("[{}]({})", src.file, src.file),
        },
        None => "—".to_string(),
    }
}

/// `"… and N more"` suffix for a list rendered with a row cap.
pub fn truncation_note(total: usize, shown: usize) -> String {
    if total > shown {
        format!("\n_… and {} more_\n", total - shown)
    } else {
        String::new()
    }
}

pub fn truncate_cap() -> usize {
    DEFAULT_TRUNCATE
}
