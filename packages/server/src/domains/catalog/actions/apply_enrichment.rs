//! Apply-enrichment action

use anyhow::Context;
use tracing::info;

use super::{apply_updates, validate_subject};
use crate::domains::catalog::error::{CatalogError, CatalogResult};
use crate::domains::catalog::models::{EnrichmentOutcome, EnrichmentRequest};
use crate::kernel::ServerDeps;

/// Patch the cached collection for `subject` and refresh its TTL.
///
/// The request is validated before the cache is touched. The merge runs inside
/// the cache's critical section, so it can't race another write for the same
/// subject. Fails with `NoBaseCollection` when nothing live is cached.
pub async fn apply_enrichment(
    subject: &str,
    request: EnrichmentRequest,
    deps: &ServerDeps,
) -> CatalogResult<EnrichmentOutcome> {
    let subject = validate_subject(subject)?;
    let updates = request.into_updates()?;

    let summary = deps
        .cache
        .update(subject, |result| apply_updates(result, &updates))
        .await
        .with_context(|| format!("Failed to persist enrichment for {}", subject))?
        .ok_or_else(|| CatalogError::NoBaseCollection {
            subject: subject.to_string(),
        })?;

    info!(
        subject,
        received = updates.len(),
        updated = summary.updated,
        total = summary.total,
        "Applied enrichment"
    );

    Ok(EnrichmentOutcome {
        ok: true,
        updated: summary.updated,
        total: summary.total,
    })
}
