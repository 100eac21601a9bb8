//! Renderer for `search_code` (spec §4.6).

use super::{truncate_cap, truncation_note, version_header};
use crate::query::SearchOutcome;

pub fn render(version: &str, outcome: &SearchOutcome) -> String {
    let mut md = String::from("# \u{1f50d} Search Results\n\n");
    md += &version_header(version);

    if outcome.query_modified {
        md += &format!(
            "_Query reduced to first token: `{}`_\n\n",
            outcome.query_used
        );
    }

    md += &format!(
        "**Match type:** {}\n\n",
        if outcome.exact_match { "exact" } else { "partial" }
    );

    if outcome.results.is_empty() {
        md += "No matches found.\n";
        return md;
    }

    let cap = truncate_cap();
    md += "| Name | Kind | Full Name | Project | ID |\n";
    md += "|------|------|-----------|---------|----|\n";
    for node in outcome.results.iter().take(cap) {
        md += &format!(
            "| `{}` | {} | `{}` | {} | `{}` |\n",
            node.name,
            node.kind,
            node.full_name,
            node.project.as_deref().unwrap_or("—"),
            node.id,
        );
    }
    md += &truncation_note(outcome.results.len(), cap);
    md
}
