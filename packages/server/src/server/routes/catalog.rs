//! Catalog routes: get, enrich and invalidate a subject's aggregation.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde::Serialize;

use crate::domains::catalog::actions;
use crate::domains::catalog::{AggregatedResult, EnrichmentOutcome, EnrichmentRequest};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// GET /aggregates/:subject
pub async fn get_aggregate_handler(
    Extension(state): Extension<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let result = actions::get_aggregated(&subject, &state.deps).await?;
    Ok(Json(result))
}

/// POST /aggregates/:subject/enrichment
pub async fn apply_enrichment_handler(
    Extension(state): Extension<AppState>,
    Path(subject): Path<String>,
    body: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Result<Json<EnrichmentOutcome>, ApiError> {
    let Json(request) = body?;
    let outcome = actions::apply_enrichment(&subject, request, &state.deps).await?;
    Ok(Json(outcome))
}

#[derive(Serialize)]
pub struct InvalidateResponse {
    ok: bool,
    removed: bool,
}

/// DELETE /aggregates/:subject
pub async fn invalidate_aggregate_handler(
    Extension(state): Extension<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let removed = actions::invalidate_aggregate(&subject, &state.deps).await?;
    Ok(Json(InvalidateResponse { ok: true, removed }))
}
