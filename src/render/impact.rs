//! Renderer for `analyze_impact` (spec §4.4, §4.6): emoji risk header,
//! summary line, grouped caller tables, and a recommendation keyed to the
//! risk level.

use super::{truncate_cap, truncation_note, version_header};
use crate::impact::{ImpactResult, RiskLevel};

fn recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => {
            "Coordinate with every affected service owner before changing this method; \
             consider a feature flag or staged rollout."
        }
        RiskLevel::High => {
            "Review the affected flows and notify their owners before merging."
        }
        RiskLevel::Medium => {
            "Double-check the single affected flow and any implementers or inheritors."
        }
        RiskLevel::Low => "Localized change; standard review should suffice.",
    }
}

pub fn render(version: &str, result: &ImpactResult) -> String {
    let mut md = String::from("# Impact Analysis\n\n");
    md += &version_header(version);

    let Some(target) = &result.target else {
        md += "Target not found.\n";
        return md;
    };

    md += &format!(
        "## {} Risk Level: {:?}\n\n",
        result.risk_level.icon(),
        result.risk_level
    );
    md += &format!("**Target:** `{}` (`{}`)\n\n", target.name, target.id);
    md += &format!(
        "**Flows affected:** {} · **Reaches presentation layer:** {}\n\n",
        result.flows_affected,
        if result.presentation_reached { "yes" } else { "no" }
    );
    md += &format!(
        "**Direct/indirect callers:** {} · **Implementers:** {} · **Inheritors:** {}\n\n",
        result.callers.len(),
        result.implementers.len(),
        result.inheritors.len()
    );

    if !result.callers.is_empty() {
        md += "## Caller Classes\n\n";
        let cap = truncate_cap();
        md += "| Class | Layer | Project | Via Interface | ID |\n";
        md += "|-------|-------|---------|----------------|----|\n";
        for caller in result.callers.iter().take(cap) {
            md += &format!(
                "| `{}` | {} | {} | {} | `{}` |\n",
                caller.class.name,
                caller.class.layer.as_deref().unwrap_or("—"),
                caller.class.project.as_deref().unwrap_or("—"),
                if caller.via_interface { "yes" } else { "no" },
                caller.class.id,
            );
        }
        md += &truncation_note(result.callers.len(), cap);
        md += "\n";
    }

    if !result.implementers.is_empty() {
        md += &format!("**Implementers:** {}\n\n", result.implementers.len());
    }
    if !result.inheritors.is_empty() {
        md += &format!("**Inheritors:** {}\n\n", result.inheritors.len());
    }

    md += "## Recommendation\n\n";
    md += recommendation(result.risk_level);
    md += "\n";
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::node;
    use crate::model::NodeKind;

    #[test]
    fn not_found_says_so() {
        let result = ImpactResult {
            found: false,
            target: None,
            callers: vec![],
            implementers: vec![],
            inheritors: vec![],
            flows_affected: 0,
            presentation_reached: false,
            risk_level: RiskLevel::Low,
            reason: Some("not found".to_string()),
        };
        assert!(render("7.10.2", &result).contains("Target not found"));
    }

    #[test]
    fn critical_risk_shows_red_icon_and_count() {
        let result = ImpactResult {
            found: true,
            target: Some(node("graph:method/p/Ns.C.M", "M", "Ns.C.M", NodeKind::Method)),
            callers: vec![],
            implementers: vec![],
            inheritors: vec![],
            flows_affected: 5,
            presentation_reached: false,
            risk_level: RiskLevel::Critical,
            reason: None,
        };
        let md = render("7.10.2", &result);
        assert!(md.contains("Risk Level: Critical"));
        assert!(md.contains("Flows affected:** 5"));
    }
}
