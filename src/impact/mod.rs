//! Impact Analyzer (spec §4.4): "what breaks if this changes?"
//!
//! Walks outward from a target method through its direct callers and
//! interface-dispatched callers, classifying each discovered class by
//! architectural layer, then scores the result by distinct service-layer
//! "flows" affected.

use crate::error::EngineResult;
use crate::model::{containing_class_of, ArrayField, GraphNode, NodeKind};
use crate::store::{require_version, DocumentStore, NodeFilter};
use std::collections::{HashSet, VecDeque};

const MAX_DEPTH: u32 = 6;
const SERVICES_LAYER: &str = "services";
const PRESENTATION_LAYER: &str = "presentation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "\u{1f534}",
            RiskLevel::High => "\u{1f7e0}",
            RiskLevel::Medium => "\u{1f7e1}",
            RiskLevel::Low => "\u{1f7e2}",
        }
    }
}

/// A discovered caller class, tagged with how it was reached.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CallerClass {
    pub class: GraphNode,
    pub via_interface: bool,
    pub upstream: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ImpactResult {
    pub found: bool,
    pub target: Option<GraphNode>,
    pub callers: Vec<CallerClass>,
    pub implementers: Vec<GraphNode>,
    pub inheritors: Vec<GraphNode>,
    pub flows_affected: usize,
    pub presentation_reached: bool,
    pub risk_level: RiskLevel,
    pub reason: Option<String>,
}

/// Resolve a node's containing class/interface by exact `fullName` match on
/// `containing_class_of(node.fullName)` (spec §4.4 step 1).
async fn containing_class_node(
    store: &dyn DocumentStore,
    version: &str,
    full_name: &str,
) -> EngineResult<Option<GraphNode>> {
    let Some(class_full_name) = containing_class_of(full_name) else {
        return Ok(None);
    };
    let filter = NodeFilter {
        full_name_exact_ci: Some(class_full_name.to_string()),
        ..Default::default()
    };
    let mut candidates = store.find(version, &filter, None).await?;
    candidates.retain(|n| matches!(n.kind, NodeKind::Class | NodeKind::Interface));
    Ok(candidates.into_iter().next())
}

fn is_upstream(class: &GraphNode) -> bool {
    matches!(
        class.layer.as_deref(),
        Some(SERVICES_LAYER) | Some(PRESENTATION_LAYER)
    )
}

fn is_presentation(class: &GraphNode) -> bool {
    class.layer.as_deref() == Some(PRESENTATION_LAYER)
}

fn is_services(class: &GraphNode) -> bool {
    class.layer.as_deref() == Some(SERVICES_LAYER)
}

pub async fn analyze_impact(
    store: &dyn DocumentStore,
    version: &str,
    node_id: &str,
) -> EngineResult<ImpactResult> {
    require_version(store, version).await?;

    let Some(target) = store.find_one(version, node_id).await? else {
        return Ok(ImpactResult {
            found: false,
            target: None,
            callers: vec![],
            implementers: vec![],
            inheritors: vec![],
            flows_affected: 0,
            presentation_reached: false,
            risk_level: RiskLevel::Low,
            reason: Some(format!("node `{node_id}` not found in v{version}")),
        });
    };

    let implementers_filter = NodeFilter {
        array_contains: Some((ArrayField::Implements, node_id.to_string())),
        ..Default::default()
    };
    let implementers = store.find(version, &implementers_filter, None).await?;

    let inheritors_filter = NodeFilter {
        array_contains: Some((ArrayField::Inherits, node_id.to_string())),
        ..Default::default()
    };
    let inheritors = store.find(version, &inheritors_filter, None).await?;

    let mut seen_class_ids: HashSet<String> = HashSet::new();
    let mut seen_method_ids: HashSet<String> = HashSet::new();
    let mut callers: Vec<CallerClass> = Vec::new();
    let mut presentation_reached = false;

    // Step 1: direct callers of the target method.
    let direct_callers_filter = NodeFilter {
        array_contains: Some((ArrayField::Calls, node_id.to_string())),
        ..Default::default()
    };
    let direct_callers = store.find(version, &direct_callers_filter, None).await?;

    let mut frontier: VecDeque<(GraphNode, bool, u32)> = VecDeque::new();

    for caller in direct_callers {
        seen_method_ids.insert(caller.id.clone());
        if let Some(class) = containing_class_node(store, version, &caller.full_name).await? {
            if seen_class_ids.insert(class.id.clone()) {
                frontier.push_back((class.clone(), false, 1));
            }
        }
    }

    // Step 2: indirect callers via the target's own containing interfaces.
    if let Some(target_class) = containing_class_node(store, version, &target.full_name).await? {
        for interface_id in target_class.implements.clone() {
            let via_filter = NodeFilter {
                array_contains: Some((ArrayField::CallsVia, interface_id.clone())),
                ..Default::default()
            };
            let via_methods = store.find(version, &via_filter, None).await?;
            for method in via_methods {
                if !seen_method_ids.insert(method.id.clone()) {
                    continue;
                }
                if let Some(class) = containing_class_node(store, version, &method.full_name).await? {
                    if seen_class_ids.insert(class.id.clone()) {
                        frontier.push_back((class, true, 1));
                    }
                }
            }
        }
    }

    // Step 3: BFS upward through interface dispatch and direct member calls.
    while let Some((class, via_interface, depth)) = frontier.pop_front() {
        if is_presentation(&class) {
            presentation_reached = true;
        }
        callers.push(CallerClass {
            upstream: is_upstream(&class),
            via_interface,
            class: class.clone(),
        });

        if depth >= MAX_DEPTH || is_presentation(&class) {
            continue;
        }

        for interface_id in class.implements.clone() {
            let via_filter = NodeFilter {
                array_contains: Some((ArrayField::CallsVia, interface_id.clone())),
                ..Default::default()
            };
            for method in store.find(version, &via_filter, None).await? {
                if !seen_method_ids.insert(method.id.clone()) {
                    continue;
                }
                if let Some(next_class) =
                    containing_class_node(store, version, &method.full_name).await?
                {
                    if seen_class_ids.insert(next_class.id.clone()) {
                        frontier.push_back((next_class, true, depth + 1));
                    }
                }
            }
        }

        for member_id in class.has_member.clone() {
            let caller_filter = NodeFilter {
                array_contains: Some((ArrayField::Calls, member_id)),
                ..Default::default()
            };
            for caller in store.find(version, &caller_filter, None).await? {
                if !seen_method_ids.insert(caller.id.clone()) {
                    continue;
                }
                if let Some(next_class) =
                    containing_class_node(store, version, &caller.full_name).await?
                {
                    if seen_class_ids.insert(next_class.id.clone()) {
                        frontier.push_back((next_class, false, depth + 1));
                    }
                }
            }
        }
    }

    // Flow = distinct (project, containingClass) pair among services-layer callers.
    let mut flows: HashSet<(String, String)> = HashSet::new();
    for caller in &callers {
        if is_services(&caller.class) {
            flows.insert((
                caller.class.project.clone().unwrap_or_default(),
                caller.class.full_name.clone(),
            ));
        }
    }
    let flows_affected = flows.len();

    let risk_level = if flows_affected > 3 {
        RiskLevel::Critical
    } else if flows_affected >= 2 {
        RiskLevel::High
    } else if flows_affected == 1
        && (presentation_reached || !implementers.is_empty() || !inheritors.is_empty())
    {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    Ok(ImpactResult {
        found: true,
        target: Some(target),
        callers,
        implementers,
        inheritors,
        flows_affected,
        presentation_reached,
        risk_level,
        reason: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::node;
    use crate::store::MemoryDocumentStore;

    fn class(id: &str, full_name: &str, layer: &str, project: &str) -> GraphNode {
        let mut c = node(id, full_name.rsplit('.').next().unwrap(), full_name, NodeKind::Class);
        c.layer = Some(layer.to_string());
        c.project = Some(project.to_string());
        c
    }

    fn method(id: &str, full_name: &str, calls: Vec<&str>) -> GraphNode {
        let mut m = node(id, full_name.rsplit('.').next().unwrap(), full_name, NodeKind::Method);
        m.calls = calls.into_iter().map(String::from).collect();
        m
    }

    #[tokio::test]
    async fn four_distinct_service_flows_is_critical() {
        let store = MemoryDocumentStore::new();
        let target = method("graph:method/p/Ns.C.M", "Ns.C.M", vec![]);
        let target_class = class("graph:class/p/Ns.C", "Ns.C", "dataAccess", "Core");
        let mut nodes = vec![target, target_class];

        for i in 0..4 {
            let proj = format!("Svc{i}");
            let class_full = format!("Ns.Caller{i}");
            let method_full = format!("Ns.Caller{i}.Do");
            let mut caller_class = class(
                &format!("graph:class/p/{class_full}"),
                &class_full,
                "services",
                &proj,
            );
            let caller_method = method(
                &format!("graph:method/p/{method_full}"),
                &method_full,
                vec!["graph:method/p/Ns.C.M"],
            );
            caller_class.has_member = vec![caller_method.id.clone()];
            nodes.push(caller_class);
            nodes.push(caller_method);
        }

        store.seed("7.10.2", nodes);
        let result = analyze_impact(&store, "7.10.2", "graph:method/p/Ns.C.M")
            .await
            .unwrap();
        assert!(result.found);
        assert_eq!(result.flows_affected, 4);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn no_callers_and_no_implementers_is_low_risk() {
        let store = MemoryDocumentStore::new();
        let target = method("graph:method/p/Ns.C.M", "Ns.C.M", vec![]);
        let target_class = class("graph:class/p/Ns.C", "Ns.C", "dataAccess", "Core");
        store.seed("7.10.2", vec![target, target_class]);

        let result = analyze_impact(&store, "7.10.2", "graph:method/p/Ns.C.M")
            .await
            .unwrap();
        assert_eq!(result.flows_affected, 0);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[tokio::test]
    async fn not_found_target_is_structured() {
        let store = MemoryDocumentStore::new();
        store.seed(
            "7.10.2",
            vec![node("graph:class/p/Ns.X", "X", "Ns.X", NodeKind::Class)],
        );
        let result = analyze_impact(&store, "7.10.2", "graph:method/p/Missing")
            .await
            .unwrap();
        assert!(!result.found);
        assert!(result.reason.is_some());
    }
}
