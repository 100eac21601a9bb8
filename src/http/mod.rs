//! REST API surface (spec §4.7): router assembly over the shared
//! [`crate::AppState`]. CORS and request tracing are `tower-http`'s
//! `CorsLayer` and `TraceLayer`, not hand-rolled middleware.

pub mod cache_admin;
pub mod error;
pub mod handlers;

use crate::AppState;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors_origins);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/graph/versions", get(handlers::list_versions))
        .route(
            "/api/graph/versions/:version/statistics",
            get(handlers::statistics),
        )
        .route(
            "/api/graph/versions/:version/semantic-stats",
            get(handlers::semantic_stats),
        )
        .route("/api/graph/search", post(handlers::search))
        .route("/api/graph/callers", post(handlers::find_callers))
        .route("/api/graph/callees", post(handlers::find_callees))
        .route(
            "/api/graph/implementations",
            post(handlers::find_implementations),
        )
        .route(
            "/api/graph/inheritance",
            post(handlers::find_inheritance_chain),
        )
        .route("/api/graph/impact", post(handlers::analyze_impact))
        .route("/api/graph/node/:id", get(handlers::get_node))
        .route("/api/graph/projects", get(handlers::list_projects))
        .route(
            "/api/graph/projects/structure",
            get(handlers::get_project_structure),
        )
        .route("/cache/stats", get(cache_admin::stats))
        .route("/cache/keys", get(cache_admin::keys))
        .route("/cache/clear", delete(cache_admin::clear))
        .merge(crate::sse::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
