//! Renderer for `find_implementations` (spec §4.6).

use super::{truncate_cap, truncation_note, version_header};
use crate::query::ImplementationsResult;

pub fn render(version: &str, result: &ImplementationsResult) -> String {
    let mut md = String::from("# \u{1f3d7}\u{fe0f} Implementations\n\n");
    md += &version_header(version);

    let Some(interface) = &result.interface else {
        md += "Interface not found.\n";
        return md;
    };
    md += &format!(
        "**Interface:** `{}` (`{}`)\n\n",
        interface.name, interface.id
    );
    md += &format!("**Implementations found:** {}\n\n", result.implementations.len());

    if result.implementations.is_empty() {
        md += "No implementing classes found.\n";
        return md;
    }

    let cap = truncate_cap();
    md += "| Name | Project | ID |\n";
    md += "|------|---------|----|\n";
    for node in result.implementations.iter().take(cap) {
        md += &format!(
            "| `{}` | {} | `{}` |\n",
            node.name,
            node.project.as_deref().unwrap_or("—"),
            node.id,
        );
    }
    md += &truncation_note(result.implementations.len(), cap);
    md
}
