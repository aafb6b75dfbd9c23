//! Get-aggregated action: cache lookup, aggregate on miss.

use anyhow::Context;
use tracing::{debug, info, warn};

use super::{aggregate, apply_updates, fetch_item_details, validate_subject, UpstreamFault};
use crate::domains::catalog::error::CatalogResult;
use crate::domains::catalog::models::AggregatedResult;
use crate::kernel::ServerDeps;

/// Return the cached collection for `subject`, aggregating it on a miss.
///
/// With single-flight enabled, concurrent misses for one subject wait on a
/// per-subject lock and re-check the cache, so only the first performs the
/// upstream fetch. A result is cached even when upstream faults truncated it;
/// if caching fails the previous cache state is kept and the call errors.
///
/// The miss path runs on its own task: once started, an aggregation completes
/// and is cached even if the caller goes away.
pub async fn get_aggregated(subject: &str, deps: &ServerDeps) -> CatalogResult<AggregatedResult> {
    let subject = validate_subject(subject)?;

    if let Some(cached) = deps.cache.get(subject).await {
        debug!(subject, "Cache hit");
        return Ok(cached);
    }

    let task_deps = deps.clone();
    let task_subject = subject.to_string();
    tokio::spawn(async move { fill(&task_subject, &task_deps).await })
        .await
        .context("Aggregation task failed")?
}

async fn fill(subject: &str, deps: &ServerDeps) -> CatalogResult<AggregatedResult> {
    let _guard = if deps.settings.single_flight {
        let guard = deps.aggregation_locks.lock(subject).await;
        if let Some(cached) = deps.cache.get(subject).await {
            debug!(subject, "Cache filled while waiting for aggregation lock");
            return Ok(cached);
        }
        Some(guard)
    } else {
        None
    };

    debug!(subject, "Cache miss, aggregating");
    let result = build(subject, deps).await;

    deps.cache
        .set(subject, result.clone())
        .await
        .with_context(|| format!("Failed to cache aggregation for {}", subject))?;

    Ok(result)
}

async fn build(subject: &str, deps: &ServerDeps) -> AggregatedResult {
    let settings = &deps.settings;
    let aggregation = aggregate(deps.page_fetcher.as_ref(), settings, subject).await;
    log_faults(subject, "listing", &aggregation.faults);

    let mut result = aggregation.result;

    if settings.fetch_item_details && !result.items.is_empty() {
        let pass = fetch_item_details(deps.detail_fetcher.as_ref(), settings, &result.items).await;
        log_faults(subject, "detail", &pass.faults);
        apply_updates(&mut result, &pass.updates);
    }

    info!(
        subject,
        items = result.items.len(),
        complete = aggregation.faults.is_empty(),
        "Aggregated subject"
    );
    result
}

fn log_faults(subject: &str, stage: &str, faults: &[UpstreamFault]) {
    for fault in faults {
        warn!(
            subject,
            stage,
            url = %fault.url,
            page = fault.page,
            reason = %fault.reason,
            "Upstream call failed, keeping partial result"
        );
    }
}
