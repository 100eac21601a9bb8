//! Renderer for `get_code_context` (spec §4.6): a target node plus its
//! immediate neighborhood — inbound callers, outbound calls, uses,
//! implements, inherits.

use super::{truncate_cap, truncation_note, version_header};
use crate::model::GraphNode;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CodeContext {
    pub found: bool,
    pub target: Option<GraphNode>,
    pub inbound_callers: Vec<GraphNode>,
    pub outbound_calls: Vec<GraphNode>,
    pub uses: Vec<GraphNode>,
    pub implements: Vec<GraphNode>,
    pub inherits: Vec<GraphNode>,
    pub reason: Option<String>,
}

fn id_list(title: &str, nodes: &[GraphNode]) -> String {
    if nodes.is_empty() {
        return String::new();
    }
    let cap = truncate_cap();
    let mut md = format!("## {title} ({})\n\n", nodes.len());
    for n in nodes.iter().take(cap) {
        md += &format!("- `{}` ({}) — `{}`\n", n.name, n.kind, n.id);
    }
    md += &truncation_note(nodes.len(), cap);
    md += "\n";
    md
}

pub fn render(version: &str, ctx: &CodeContext) -> String {
    let mut md = String::from("# \u{1f4c4} Code Context\n\n");
    md += &version_header(version);

    let Some(target) = &ctx.target else {
        md += "Target not found.\n";
        return md;
    };

    md += &format!("## Target\n\n");
    md += &format!("- **Name:** `{}`\n", target.name);
    md += &format!("- **Kind:** {}\n", target.kind);
    md += &format!("- **Full name:** `{}`\n", target.full_name);
    md += &format!("- **ID:** `{}`\n", target.id);
    if let Some(project) = &target.project {
        md += &format!("- **Project:** {project}\n");
    }
    if let Some(layer) = &target.layer {
        md += &format!("- **Layer:** {layer}\n");
    }
    md += "\n";

    md += &id_list("Inbound Callers", &ctx.inbound_callers);
    md += &id_list("Outbound Calls", &ctx.outbound_calls);
    md += &id_list("Uses", &ctx.uses);
    md += &id_list("Implements", &ctx.implements);
    md += &id_list("Inherits", &ctx.inherits);

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::node;
    use crate::model::NodeKind;

    #[test]
    fn renders_target_header_and_neighbors() {
        let ctx = CodeContext {
            found: true,
            target: Some(node("graph:class/p/Ns.C", "C", "Ns.C", NodeKind::Class)),
            inbound_callers: vec![node("graph:method/p/Ns.A.M", "M", "Ns.A.M", NodeKind::Method)],
            outbound_calls: vec![],
            uses: vec![],
            implements: vec![],
            inherits: vec![],
            reason: None,
        };
        let md = render("7.10.2", &ctx);
        assert!(md.contains("Ns.C"));
        assert!(md.contains("Inbound Callers"));
    }
}
