//! Renderers for `find_callers`, `find_callees`, `find_inheritance_chain`
//! (spec §4.6).

use super::{truncate_cap, truncation_note, version_header};
use crate::query::{CalleesResult, CallersResult, DepthNode, InheritanceResult};

fn depth_table(rows: &[DepthNode]) -> String {
    let cap = truncate_cap();
    let mut md = String::from("| Name | Kind | Depth | Project | ID |\n");
    md += "|------|------|-------|---------|----|\n";
    for d in rows.iter().take(cap) {
        md += &format!(
            "| `{}` | {} | {} | {} | `{}` |\n",
            d.node.name,
            d.node.kind,
            d.depth,
            d.node.project.as_deref().unwrap_or("—"),
            d.node.id,
        );
    }
    md += &truncation_note(rows.len(), cap);
    md
}

pub fn render_callers(version: &str, result: &CallersResult) -> String {
    let mut md = String::from("# \u{2b05}\u{fe0f} Callers\n\n");
    md += &version_header(version);

    let Some(target) = &result.target else {
        md += "Target not found.\n";
        return md;
    };
    md += &format!("**Target:** `{}` (`{}`)\n\n", target.name, target.id);
    md += &format!(
        "**Direct callers:** {} · **Indirect callers:** {}\n\n",
        result.callers.len(),
        result.indirect_callers.len()
    );

    if !result.callers.is_empty() {
        md += "## Direct\n\n";
        md += &depth_table(&result.callers);
    }
    if !result.indirect_callers.is_empty() {
        md += "\n## Via Interface Dispatch\n\n";
        md += &depth_table(&result.indirect_callers);
    }
    if result.callers.is_empty() && result.indirect_callers.is_empty() {
        md += "No callers found within the requested depth.\n";
    }
    md
}

pub fn render_callees(version: &str, result: &CalleesResult) -> String {
    let mut md = String::from("# \u{27a1}\u{fe0f} Callees\n\n");
    md += &version_header(version);

    let Some(source) = &result.source else {
        md += "Source not found.\n";
        return md;
    };
    md += &format!("**Source:** `{}` (`{}`)\n\n", source.name, source.id);
    md += &format!(
        "**Direct callees:** {} · **Via interface:** {}\n\n",
        result.callees.len(),
        result.via_interface.len()
    );

    if !result.callees.is_empty() {
        md += "## Direct\n\n";
        md += &depth_table(&result.callees);
    }
    if !result.via_interface.is_empty() {
        md += "\n## Via Interface Dispatch\n\n";
        md += &depth_table(&result.via_interface);
    }
    if result.callees.is_empty() && result.via_interface.is_empty() {
        md += "No callees found within the requested depth.\n";
    }
    md
}

pub fn render_inheritance(version: &str, result: &InheritanceResult) -> String {
    let mut md = String::from("# \u{1f517} Inheritance Chain\n\n");
    md += &version_header(version);

    let Some(class) = &result.class else {
        md += "Class not found.\n";
        return md;
    };
    md += &format!("**Class:** `{}` (`{}`)\n\n", class.name, class.id);
    md += &format!(
        "**Ancestors:** {} · **Descendants:** {}\n\n",
        result.ancestors.len(),
        result.descendants.len()
    );

    if !result.ancestors.is_empty() {
        md += "## Ancestors (base types)\n\n";
        md += &depth_table(&result.ancestors);
    }
    if !result.descendants.is_empty() {
        md += "\n## Descendants (derived types)\n\n";
        md += &depth_table(&result.descendants);
    }
    md
}
