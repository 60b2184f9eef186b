pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::insights::handlers as insights;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/api/v1/skills/extract", post(extraction::handle_extract))
        .route(
            "/api/v1/skills/extract/batch",
            post(extraction::handle_extract_batch),
        )
        .route("/api/v1/skills/explain", post(extraction::handle_explain))
        // Catalog API
        .route(
            "/api/v1/catalog",
            get(extraction::handle_get_catalog).put(extraction::handle_replace_catalog),
        )
        .route(
            "/api/v1/catalog/resolve",
            get(extraction::handle_resolve_alias),
        )
        .route(
            "/api/v1/catalog/reload",
            post(extraction::handle_reload_catalog),
        )
        .route("/api/v1/cache/stats", get(extraction::handle_cache_stats))
        // Insights API
        .route("/api/v1/insights/frequency", post(insights::handle_frequency))
        .route("/api/v1/insights/top", post(insights::handle_top_skills))
        .route(
            "/api/v1/insights/missing",
            post(insights::handle_missing_skills),
        )
        .route(
            "/api/v1/insights/suggested",
            post(insights::handle_suggested_skills),
        )
        .route("/api/v1/insights/match", post(insights::handle_match))
        .with_state(state)
}
