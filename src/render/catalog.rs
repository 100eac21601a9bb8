//! Renderers for `list_projects`, `get_project_structure`, `get_statistics`
//! (spec §4.6): numbered sections and bullet lists, one function per tool.

use super::{truncate_cap, truncation_note, version_header};
use crate::query::{ProjectStructure, SemanticStats, Statistics};
use crate::store::ProjectSummary;

pub fn render_projects(version: &str, projects: &[ProjectSummary]) -> String {
    let mut md = String::from("# \u{1f4c1} Projects\n\n");
    md += &version_header(version);

    if projects.is_empty() {
        md += "No projects found.\n";
        return md;
    }

    md += &format!("**Total projects found:** {}\n\n", projects.len());
    md += "---\n\n";

    let cap = truncate_cap();
    for (i, project) in projects.iter().take(cap).enumerate() {
        md += &format!("## {}. {}\n\n", i + 1, project.name);
        md += &format!("- **Elements:** {} nodes\n", project.node_count);
        if !project.solutions.is_empty() {
            md += &format!("- **Solutions:** {}\n", project.solutions.join(", "));
        }
        md += "\n";
    }
    md += &truncation_note(projects.len(), cap);
    md
}

pub fn render_project_structure(version: &str, structure: &ProjectStructure) -> String {
    let mut md = String::from("# \u{1f5c2}\u{fe0f} Project Structure\n\n");
    md += &version_header(version);
    md += &format!("**Project:** `{}`\n\n", structure.project);

    if !structure.found {
        md += "No elements found in this project.\n";
        return md;
    }

    md += &format!("**Total elements:** {}\n\n", structure.total);
    md += "---\n\n";

    let cap = truncate_cap();
    for (kind, nodes) in &structure.by_kind {
        md += &format!("## {kind}s ({})\n\n", nodes.len());
        for node in nodes.iter().take(cap) {
            md += &format!("- `{}` — `{}`\n", node.name, node.id);
        }
        md += &truncation_note(nodes.len(), cap);
        md += "\n";
    }
    md
}

pub fn render_statistics(stats: &Statistics) -> String {
    let mut md = String::from("# \u{1f4ca} Statistics\n\n");
    md += &version_header(&stats.version);
    md += &format!("**Total nodes:** {}\n\n", stats.total_nodes);
    md += &format!("**Distinct projects:** {}\n", stats.distinct_projects);
    md += &format!("**Distinct solutions:** {}\n\n", stats.distinct_solutions);

    if !stats.by_kind.is_empty() {
        md += "## By Kind\n\n";
        let mut kinds: Vec<(&String, &u64)> = stats.by_kind.iter().collect();
        kinds.sort_by(|a, b| a.0.cmp(b.0));
        md += "| Kind | Count |\n|------|-------|\n";
        for (kind, count) in kinds {
            md += &format!("| {kind} | {count} |\n");
        }
    }
    md
}

pub fn render_semantic_stats(stats: &SemanticStats) -> String {
    let mut md = String::from("# \u{1f9ec} Semantic Statistics\n\n");
    md += &version_header(&stats.version);
    md += "| Relationship | Count |\n|--------------|-------|\n";
    md += &format!("| calls | {} |\n", stats.calls);
    md += &format!("| callsVia | {} |\n", stats.calls_via);
    md += &format!("| implements | {} |\n", stats.implements);
    md += &format!("| inherits | {} |\n", stats.inherits);
    md += &format!("| uses | {} |\n", stats.uses);
    md += &format!("| contains | {} |\n\n", stats.contains);
    md += &format!(
        "**Classes:** {} · **Interfaces:** {}\n",
        stats.class_count, stats.interface_count
    );
    md
}
