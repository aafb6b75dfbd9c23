//! Application setup and router configuration.

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    apply_enrichment_handler, get_aggregate_handler, health_handler, invalidate_aggregate_handler,
    root_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let state = AppState { deps };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/aggregates/:subject",
            get(get_aggregate_handler).delete(invalidate_aggregate_handler),
        )
        .route(
            "/aggregates/:subject/enrichment",
            post(apply_enrichment_handler),
        )
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
