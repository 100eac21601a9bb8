//! An in-process `DocumentStore` double.
//!
//! Used by every unit test that exercises search/traversal/impact logic, and
//! usable as a local-dev backend when no MongoDB instance is at hand.

use super::{DocumentStore, KindCounts, NodeFilter, ProjectSummary, SemanticCounts};
use crate::error::EngineResult;
use crate::model::{ArrayField, GraphNode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryDocumentStore {
    // version -> (id -> node)
    collections: RwLock<HashMap<String, HashMap<String, GraphNode>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or replace) a version's collection wholesale, the way the
    /// out-of-scope indexer would atomically swap one in.
    pub fn seed(&self, version: &str, nodes: Vec<GraphNode>) {
        let mut collections = self.collections.write().unwrap();
        let map = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
        collections.insert(version.to_string(), map);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_versions(&self) -> EngineResult<Vec<String>> {
        let collections = self.collections.read().unwrap();
        let mut versions: Vec<String> = collections
            .iter()
            .filter(|(_, nodes)| !nodes.is_empty())
            .map(|(v, _)| v.clone())
            .collect();
        versions.sort();
        Ok(versions)
    }

    async fn version_exists(&self, version: &str) -> EngineResult<bool> {
        let collections = self.collections.read().unwrap();
        Ok(collections.get(version).is_some_and(|m| !m.is_empty()))
    }

    async fn find_one(&self, version: &str, id: &str) -> EngineResult<Option<GraphNode>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.get(version).and_then(|m| m.get(id)).cloned())
    }

    async fn find_by_ids(&self, version: &str, ids: &[String]) -> EngineResult<Vec<GraphNode>> {
        let collections = self.collections.read().unwrap();
        let Some(map) = collections.get(version) else {
            return Ok(vec![]);
        };
        Ok(ids.iter().filter_map(|id| map.get(id)).cloned().collect())
    }

    async fn find(
        &self,
        version: &str,
        filter: &NodeFilter,
        limit: Option<usize>,
    ) -> EngineResult<Vec<GraphNode>> {
        let collections = self.collections.read().unwrap();
        let Some(map) = collections.get(version) else {
            return Ok(vec![]);
        };
        let mut results: Vec<GraphNode> = map
            .values()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(limit) = limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    async fn count(&self, version: &str, filter: &NodeFilter) -> EngineResult<u64> {
        let collections = self.collections.read().unwrap();
        let Some(map) = collections.get(version) else {
            return Ok(0);
        };
        Ok(map.values().filter(|n| filter.matches(n)).count() as u64)
    }

    async fn kind_counts(&self, version: &str) -> EngineResult<KindCounts> {
        let collections = self.collections.read().unwrap();
        let mut counts = KindCounts::default();
        let Some(map) = collections.get(version) else {
            return Ok(counts);
        };
        let mut projects = std::collections::HashSet::new();
        let mut solutions = std::collections::HashSet::new();
        for node in map.values() {
            *counts.by_kind.entry(node.kind.to_string()).or_insert(0) += 1;
            counts.total += 1;
            if let Some(p) = &node.project {
                projects.insert(p.clone());
            }
            if let Some(s) = &node.solution {
                solutions.insert(s.clone());
            }
        }
        counts.distinct_projects = projects.len() as u64;
        counts.distinct_solutions = solutions.len() as u64;
        Ok(counts)
    }

    async fn semantic_counts(&self, version: &str) -> EngineResult<SemanticCounts> {
        let collections = self.collections.read().unwrap();
        let mut counts = SemanticCounts::default();
        let Some(map) = collections.get(version) else {
            return Ok(counts);
        };
        for node in map.values() {
            counts.calls += node.array_field(ArrayField::Calls).len() as u64;
            counts.calls_via += node.array_field(ArrayField::CallsVia).len() as u64;
            counts.implements += node.array_field(ArrayField::Implements).len() as u64;
            counts.inherits += node.array_field(ArrayField::Inherits).len() as u64;
            counts.uses += node.array_field(ArrayField::Uses).len() as u64;
            counts.contains += node.array_field(ArrayField::Contains).len() as u64;
            match node.kind {
                crate::model::NodeKind::Class => counts.class_count += 1,
                crate::model::NodeKind::Interface => counts.interface_count += 1,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn list_projects(
        &self,
        version: &str,
        query: Option<&str>,
        limit: usize,
    ) -> EngineResult<Vec<ProjectSummary>> {
        let collections = self.collections.read().unwrap();
        let Some(map) = collections.get(version) else {
            return Ok(vec![]);
        };
        let needle = query.map(|q| q.to_lowercase());
        let mut grouped: HashMap<String, (u64, std::collections::HashSet<String>)> = HashMap::new();
        for node in map.values() {
            let Some(project) = &node.project else {
                continue;
            };
            if let Some(needle) = &needle {
                if !project.to_lowercase().contains(needle) {
                    continue;
                }
            }
            let entry = grouped.entry(project.clone()).or_default();
            entry.0 += 1;
            if let Some(solution) = &node.solution {
                entry.1.insert(solution.clone());
            }
        }
        let mut projects: Vec<ProjectSummary> = grouped
            .into_iter()
            .map(|(name, (node_count, solutions))| {
                let mut solutions: Vec<String> = solutions.into_iter().collect();
                solutions.sort();
                ProjectSummary { name, node_count, solutions }
            })
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects.truncate(limit);
        Ok(projects)
    }
}
