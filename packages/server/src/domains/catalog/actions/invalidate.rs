//! Invalidate action

use anyhow::Context;
use tracing::info;

use super::validate_subject;
use crate::domains::catalog::error::CatalogResult;
use crate::kernel::ServerDeps;

/// Drop the cached collection for `subject`. Returns whether one was live.
pub async fn invalidate_aggregate(subject: &str, deps: &ServerDeps) -> CatalogResult<bool> {
    let subject = validate_subject(subject)?;

    let removed = deps
        .cache
        .invalidate(subject)
        .await
        .with_context(|| format!("Failed to persist invalidation for {}", subject))?;

    info!(subject, removed, "Invalidated aggregation");
    Ok(removed)
}
