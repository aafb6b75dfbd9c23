use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    cached_subjects: usize,
}

/// Health check endpoint
///
/// The service has no database or broker to probe; it is healthy whenever it
/// can answer. Reports how many subjects are currently cached.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let cached_subjects = state.deps.cache.live_count().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            cached_subjects,
        }),
    )
}

/// Plain-text banner for the root path
pub async fn root_handler() -> &'static str {
    "Server is running! Use /aggregates/{subject} to fetch a subject's aggregated items."
}
