//! MongoDB-backed `DocumentStore`.
//!
//! Collections are resolved once per call via [`super::collection_name`];
//! nothing here ever issues a query that spans more than one collection.

use super::{require_version, DocumentStore, KindCounts, NodeFilter, ProjectSummary, SemanticCounts};
use crate::error::{EngineError, EngineResult};
use crate::model::{ArrayField, GraphNode};
use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, Database};
use tracing::{debug, warn};

pub struct MongoDocumentStore {
    db: Database,
}

impl MongoDocumentStore {
    pub async fn connect(connection_string: &str, database: &str) -> EngineResult<Self> {
        let client = Client::with_uri_str(connection_string)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;

        // Fail fast on a dead connection rather than lazily on first query —
        // per spec §9 ("avoid lazy re-connect paths ... that hides failures").
        client
            .database(database)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;

        Ok(Self {
            db: client.database(database),
        })
    }

    fn collection(&self, version: &str) -> mongodb::Collection<GraphNode> {
        self.db.collection(&super::collection_name(version))
    }
}

/// Escape regex metacharacters so a literal query token (which may contain
/// `.`, `(`, `$`, etc. — fully-qualified names are full of dots) never gets
/// interpreted as a pattern.
fn escape_regex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn filter_to_document(filter: &NodeFilter) -> Document {
    let mut conditions: Vec<Document> = Vec::new();

    if let Some(kind) = filter.kind {
        conditions.push(doc! { "kind": kind.as_str() });
    }
    if let Some(ids) = &filter.ids_in {
        conditions.push(doc! { "_id": { "$in": ids } });
    }
    if let Some(name) = &filter.name_exact_ci {
        conditions.push(doc! {
            "name": { "$regex": format!("^{}$", escape_regex(name)), "$options": "i" }
        });
    }
    if let Some(full_name) = &filter.full_name_exact_ci {
        conditions.push(doc! {
            "fullName": { "$regex": format!("^{}$", escape_regex(full_name)), "$options": "i" }
        });
    }
    if let Some(needle) = &filter.name_or_full_name_contains_ci {
        let needle = escape_regex(needle);
        conditions.push(doc! {
            "$or": [
                { "name": { "$regex": needle.clone(), "$options": "i" } },
                { "fullName": { "$regex": needle, "$options": "i" } },
            ]
        });
    }
    if let Some(needle) = &filter.solution_contains_ci {
        conditions.push(doc! { "solution": { "$regex": escape_regex(needle), "$options": "i" } });
    }
    if let Some(needle) = &filter.project_contains_ci {
        conditions.push(doc! { "project": { "$regex": escape_regex(needle), "$options": "i" } });
    }
    if let Some((field, target)) = &filter.array_contains {
        conditions.push(doc! { field.name(): target });
    }

    match conditions.len() {
        0 => doc! {},
        1 => conditions.remove(0),
        _ => doc! { "$and": conditions },
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn list_versions(&self) -> EngineResult<Vec<String>> {
        let names = self
            .db
            .list_collection_names(doc! { "name": { "$regex": "^nodes_" } })
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;

        let mut versions = Vec::new();
        for name in names {
            if let Some(version) = super::version_from_collection(&name) {
                // Collections with zero documents are "not available" per spec §3.
                let count = self
                    .db
                    .collection::<Document>(&name)
                    .count_documents(doc! {}, None)
                    .await
                    .unwrap_or(0);
                if count > 0 {
                    versions.push(version);
                }
            }
        }
        versions.sort();
        Ok(versions)
    }

    async fn version_exists(&self, version: &str) -> EngineResult<bool> {
        let count = self
            .collection(version)
            .count_documents(doc! {}, None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;
        Ok(count > 0)
    }

    async fn find_one(&self, version: &str, id: &str) -> EngineResult<Option<GraphNode>> {
        require_version(self, version).await?;
        self.collection(version)
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    async fn find_by_ids(&self, version: &str, ids: &[String]) -> EngineResult<Vec<GraphNode>> {
        require_version(self, version).await?;
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let cursor = self
            .collection(version)
            .find(doc! { "_id": { "$in": ids } }, None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    async fn find(
        &self,
        version: &str,
        filter: &NodeFilter,
        limit: Option<usize>,
    ) -> EngineResult<Vec<GraphNode>> {
        require_version(self, version).await?;
        let mut options = FindOptions::default();
        if let Some(limit) = limit {
            options.limit = Some(limit as i64);
        }
        let query = filter_to_document(filter);
        debug!(?query, version, "store find");
        let cursor = self
            .collection(version)
            .find(query, options)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    async fn count(&self, version: &str, filter: &NodeFilter) -> EngineResult<u64> {
        require_version(self, version).await?;
        self.collection(version)
            .count_documents(filter_to_document(filter), None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))
    }

    async fn kind_counts(&self, version: &str) -> EngineResult<KindCounts> {
        require_version(self, version).await?;
        let raw: mongodb::Collection<Document> =
            self.db.collection(&super::collection_name(version));

        let mut by_kind = std::collections::HashMap::new();
        let mut total = 0u64;
        let mut cursor = raw
            .aggregate(
                vec![doc! { "$group": { "_id": "$kind", "count": { "$sum": 1 } } }],
                None,
            )
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?
        {
            if let (Ok(kind), Ok(count)) = (doc.get_str("_id"), doc.get_i32("count")) {
                by_kind.insert(kind.to_string(), count as u64);
                total += count as u64;
            }
        }

        let distinct_projects = raw
            .distinct("project", doc! {}, None)
            .await
            .map(|v| v.into_iter().filter(|b| !matches!(b, bson::Bson::Null)).count() as u64)
            .unwrap_or_else(|e| {
                warn!(error = %e, "distinct(project) failed");
                0
            });
        let distinct_solutions = raw
            .distinct("solution", doc! {}, None)
            .await
            .map(|v| v.into_iter().filter(|b| !matches!(b, bson::Bson::Null)).count() as u64)
            .unwrap_or_else(|e| {
                warn!(error = %e, "distinct(solution) failed");
                0
            });

        Ok(KindCounts {
            by_kind,
            distinct_projects,
            distinct_solutions,
            total,
        })
    }

    async fn semantic_counts(&self, version: &str) -> EngineResult<SemanticCounts> {
        require_version(self, version).await?;
        let raw: mongodb::Collection<Document> =
            self.db.collection(&super::collection_name(version));

        let sum_of = |field: ArrayField| {
            vec![doc! {
                "$group": {
                    "_id": null,
                    "total": { "$sum": { "$size": { "$ifNull": [format!("${}", field.name()), []] } } }
                }
            }]
        };

        let mut counts = SemanticCounts::default();
        for (field, slot) in [
            (ArrayField::Calls, &mut counts.calls),
            (ArrayField::CallsVia, &mut counts.calls_via),
            (ArrayField::Implements, &mut counts.implements),
            (ArrayField::Inherits, &mut counts.inherits),
            (ArrayField::Uses, &mut counts.uses),
            (ArrayField::Contains, &mut counts.contains),
        ] {
            let mut cursor = raw
                .aggregate(sum_of(field), None)
                .await
                .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;
            if let Some(doc) = cursor
                .try_next()
                .await
                .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?
            {
                *slot = doc.get_i64("total").unwrap_or(0) as u64;
            }
        }

        counts.class_count = raw
            .count_documents(doc! { "kind": "class" }, None)
            .await
            .unwrap_or(0);
        counts.interface_count = raw
            .count_documents(doc! { "kind": "interface" }, None)
            .await
            .unwrap_or(0);

        Ok(counts)
    }

    async fn list_projects(
        &self,
        version: &str,
        query: Option<&str>,
        limit: usize,
    ) -> EngineResult<Vec<ProjectSummary>> {
        require_version(self, version).await?;
        let raw: mongodb::Collection<Document> =
            self.db.collection(&super::collection_name(version));

        let mut pipeline = Vec::new();
        if let Some(query) = query {
            pipeline.push(doc! {
                "$match": { "project": { "$regex": escape_regex(query), "$options": "i" } }
            });
        }
        pipeline.push(doc! {
            "$group": {
                "_id": "$project",
                "count": { "$sum": 1 },
                "solutions": { "$addToSet": "$solution" },
            }
        });
        pipeline.push(doc! { "$sort": { "_id": 1 } });
        pipeline.push(doc! { "$limit": limit as i64 });

        let mut cursor = raw
            .aggregate(pipeline, None)
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?;

        let mut projects = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| EngineError::StoreUnavailable(e.to_string()))?
        {
            let Ok(name) = doc.get_str("_id") else {
                continue;
            };
            let node_count = doc.get_i32("count").unwrap_or(0) as u64;
            let solutions = doc
                .get_array("solutions")
                .map(|arr| {
                    arr.iter()
                        .filter_map(|b| b.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            projects.push(ProjectSummary {
                name: name.to_string(),
                node_count,
                solutions,
            });
        }
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    #[test]
    fn escape_regex_neutralizes_metacharacters() {
        assert_eq!(escape_regex("Process.Message"), "Process\\.Message");
        assert_eq!(escape_regex("A(B)C"), "A\\(B\\)C");
        assert_eq!(escape_regex("plain"), "plain");
    }

    #[test]
    fn filter_to_document_ands_multiple_conditions() {
        let filter = NodeFilter {
            kind: Some(NodeKind::Method),
            project_contains_ci: Some("BackOffice".to_string()),
            ..Default::default()
        };
        let doc = filter_to_document(&filter);
        assert!(doc.contains_key("$and"));
    }

    #[test]
    fn filter_to_document_single_condition_is_unwrapped() {
        let filter = NodeFilter {
            kind: Some(NodeKind::Method),
            ..Default::default()
        };
        let doc = filter_to_document(&filter);
        assert!(!doc.contains_key("$and"));
        assert_eq!(doc.get_str("kind").unwrap(), "method");
    }

    #[test]
    fn filter_to_document_empty_is_empty() {
        let filter = NodeFilter::default();
        assert!(filter_to_document(&filter).is_empty());
    }
}
