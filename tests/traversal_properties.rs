//! Spec §8 invariants and concrete scenarios, exercised directly against
//! `NodeQueryService` over `MemoryDocumentStore` — no HTTP/SSE framing
//! involved, unlike `http_api.rs`/`sse_gateway.rs`.

use codegraph_query_engine::cache::backend::NullBackend;
use codegraph_query_engine::cache::CacheClient;
use codegraph_query_engine::error::EngineError;
use codegraph_query_engine::model::{GraphNode, NodeKind};
use codegraph_query_engine::query::{NodeQueryService, SearchParams};
use codegraph_query_engine::store::MemoryDocumentStore;
use std::sync::Arc;
use std::time::Duration;

fn node(id: &str, name: &str, full_name: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        name: name.to_string(),
        full_name: full_name.to_string(),
        kind,
        language: None,
        namespace: None,
        project: None,
        solution: None,
        layer: None,
        source: None,
        is_abstract: false,
        is_static: false,
        is_sealed: false,
        accessibility: None,
        contains: vec![],
        contained_in: vec![],
        has_member: vec![],
        inherits: vec![],
        implements: vec![],
        calls: vec![],
        calls_via: vec![],
        indirect_call: vec![],
        uses: vec![],
    }
}

fn service() -> (Arc<MemoryDocumentStore>, NodeQueryService) {
    let store = Arc::new(MemoryDocumentStore::new());
    let cache = Arc::new(CacheClient::new(Arc::new(NullBackend), Duration::from_secs(60)));
    let query = NodeQueryService::new(store.clone(), cache);
    (store, query)
}

/// Concrete scenario 1: exact precedence. One `ProcessMessage` plus three
/// `ProcessMessageHandler`s must never surface the handlers when the exact
/// name exists.
#[tokio::test]
async fn exact_match_excludes_partial_candidates() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![
            node(
                "graph:method/svc/Ns.C.ProcessMessage",
                "ProcessMessage",
                "Ns.C.ProcessMessage",
                NodeKind::Method,
            ),
            node(
                "graph:method/svc/Ns.C.ProcessMessageHandler",
                "ProcessMessageHandler",
                "Ns.C.ProcessMessageHandler",
                NodeKind::Method,
            ),
            node(
                "graph:method/svc/Ns.D.ProcessMessageHandler",
                "ProcessMessageHandler",
                "Ns.D.ProcessMessageHandler",
                NodeKind::Method,
            ),
            node(
                "graph:method/svc/Ns.E.ProcessMessageHandler",
                "ProcessMessageHandler",
                "Ns.E.ProcessMessageHandler",
                NodeKind::Method,
            ),
        ],
    );

    let outcome = query
        .search(
            "7.10.2",
            SearchParams {
                query: "ProcessMessage".to_string(),
                kind: Some(NodeKind::Method),
                limit: 50,
                exact_first: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.exact_match);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].name, "ProcessMessage");
}

/// Concrete scenario 2: version isolation. Querying an absent version
/// returns a structured `VersionUnavailable`, never an empty success, and
/// names the versions that do exist.
#[tokio::test]
async fn absent_version_is_unavailable_not_empty_success() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![node(
            "graph:class/p/Ns.A",
            "A",
            "Ns.A",
            NodeKind::Class,
        )],
    );

    let err = query
        .search(
            "9.0.0",
            SearchParams {
                query: "A".to_string(),
                limit: 10,
                exact_first: true,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    match err {
        EngineError::VersionUnavailable { requested, available } => {
            assert_eq!(requested, "9.0.0");
            assert_eq!(available, vec!["7.10.2".to_string()]);
        }
        other => panic!("expected VersionUnavailable, got {other:?}"),
    }
}

/// Concrete scenario 3: class-filter extraction. Of two candidates sharing
/// a method name, only the one whose containing class matches survives.
#[tokio::test]
async fn containing_class_filter_keeps_only_matching_candidate() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![
            node(
                "graph:method/svc/Ns.Communication.InsertMessage",
                "InsertMessage",
                "Ns.Communication.InsertMessage",
                NodeKind::Method,
            ),
            node(
                "graph:method/svc/Ns.CommunicationService.InsertMessage",
                "InsertMessage",
                "Ns.CommunicationService.InsertMessage",
                NodeKind::Method,
            ),
        ],
    );

    let outcome = query
        .search(
            "7.10.2",
            SearchParams {
                query: "InsertMessage".to_string(),
                kind: Some(NodeKind::Method),
                limit: 50,
                exact_first: true,
                containing_class: Some("Communication".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].full_name, "Ns.Communication.InsertMessage");
}

/// Concrete scenario 4: bounded callers. A->M depth 1, B->A depth 2, C->B
/// depth 3; `maxDepth=2` must return exactly {A@1, B@2}, never C.
#[tokio::test]
async fn bounded_depth_excludes_the_node_beyond_max_depth() {
    let (store, query) = service();
    let mut a = node("graph:method/p/Ns.A", "A", "Ns.A", NodeKind::Method);
    let mut b = node("graph:method/p/Ns.B", "B", "Ns.B", NodeKind::Method);
    let mut c = node("graph:method/p/Ns.C", "C", "Ns.C", NodeKind::Method);
    let m = node("graph:method/p/Ns.M", "M", "Ns.M", NodeKind::Method);
    a.calls = vec!["graph:method/p/Ns.M".to_string()];
    b.calls = vec!["graph:method/p/Ns.A".to_string()];
    c.calls = vec!["graph:method/p/Ns.B".to_string()];
    store.seed("7.10.2", vec![m, a, b, c]);

    let result = query
        .find_callers("7.10.2", "graph:method/p/Ns.M", 2, false)
        .await
        .unwrap();

    assert!(result.found);
    let reached: Vec<(&str, u32)> = result
        .callers
        .iter()
        .map(|d| (d.node.name.as_str(), d.depth))
        .collect();
    assert_eq!(reached, vec![("A", 1), ("B", 2)]);
    assert!(!reached.iter().any(|(name, _)| *name == "C"));
}

/// Concrete scenario 6: dead-edge tolerance. `calls = [T1, T2]` with `T2`
/// missing from the version's collection must not raise an error.
#[tokio::test]
async fn dead_edge_is_skipped_not_raised() {
    let (store, query) = service();
    let mut s = node("graph:method/p/Ns.S", "S", "Ns.S", NodeKind::Method);
    s.calls = vec![
        "graph:method/p/Ns.T1".to_string(),
        "graph:method/p/Ns.T2_missing".to_string(),
    ];
    let t1 = node("graph:method/p/Ns.T1", "T1", "Ns.T1", NodeKind::Method);
    store.seed("7.10.2", vec![s, t1]);

    let result = query
        .find_callees("7.10.2", "graph:method/p/Ns.S", 3, false)
        .await
        .unwrap();

    assert!(result.found);
    assert_eq!(result.callees.len(), 1);
    assert_eq!(result.callees[0].node.name, "T1");
}

/// Boundary: `maxDepth = 0` returns an empty traversal with `found:true`.
#[tokio::test]
async fn zero_max_depth_is_empty_but_found() {
    let (store, query) = service();
    let mut a = node("graph:method/p/Ns.A", "A", "Ns.A", NodeKind::Method);
    let m = node("graph:method/p/Ns.M", "M", "Ns.M", NodeKind::Method);
    a.calls = vec!["graph:method/p/Ns.M".to_string()];
    store.seed("7.10.2", vec![m, a]);

    let result = query
        .find_callers("7.10.2", "graph:method/p/Ns.M", 0, false)
        .await
        .unwrap();
    assert!(result.found);
    assert!(result.callers.is_empty());
}

/// Boundary: `limit = 0` on search returns an empty list, not an error.
#[tokio::test]
async fn zero_limit_search_returns_empty_list() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![node("graph:class/p/Ns.A", "A", "Ns.A", NodeKind::Class)],
    );

    let outcome = query
        .search(
            "7.10.2",
            SearchParams {
                query: "A".to_string(),
                limit: 0,
                exact_first: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
}

/// Boundary: a multi-word query keeps only its first token, and the
/// response notes the modification.
#[tokio::test]
async fn multi_word_query_is_reduced_to_first_token() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![node(
            "graph:method/p/Ns.ProcessMessage",
            "ProcessMessage",
            "Ns.ProcessMessage",
            NodeKind::Method,
        )],
    );

    let outcome = query
        .search(
            "7.10.2",
            SearchParams {
                query: "ProcessMessage extra tokens".to_string(),
                limit: 10,
                exact_first: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.query_used, "ProcessMessage");
    assert!(outcome.query_modified);
    assert_eq!(outcome.results.len(), 1);
}

/// Invariant 2: a search response is either all-exact or all-partial, never
/// a mix, even across repeated calls (cache-wrapped determinism).
#[tokio::test]
async fn repeated_search_is_byte_stable_and_never_mixes_match_modes() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![
            node(
                "graph:method/p/Ns.Handle",
                "Handle",
                "Ns.Handle",
                NodeKind::Method,
            ),
            node(
                "graph:method/p/Ns.HandleMessage",
                "HandleMessage",
                "Ns.HandleMessage",
                NodeKind::Method,
            ),
        ],
    );

    let params = SearchParams {
        query: "Handle".to_string(),
        limit: 10,
        exact_first: true,
        ..Default::default()
    };
    let first = query.search("7.10.2", params.clone()).await.unwrap();
    let second = query.search("7.10.2", params).await.unwrap();

    assert!(first.exact_match);
    assert_eq!(first.results.len(), 1);
    assert_eq!(
        serde_json::to_string(&first.results).unwrap(),
        serde_json::to_string(&second.results).unwrap()
    );
}

/// Invariant 1: results from one version never leak nodes seeded only into
/// another version's collection.
#[tokio::test]
async fn results_never_cross_version_boundaries() {
    let (store, query) = service();
    store.seed(
        "7.10.2",
        vec![node(
            "graph:class/p/Ns.Shared",
            "Shared",
            "Ns.Shared",
            NodeKind::Class,
        )],
    );
    store.seed(
        "8.0.0",
        vec![node(
            "graph:class/p/Ns.OnlyInEight",
            "OnlyInEight",
            "Ns.OnlyInEight",
            NodeKind::Class,
        )],
    );

    let outcome = query
        .search(
            "7.10.2",
            SearchParams {
                query: "Only".to_string(),
                limit: 10,
                exact_first: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
}
