//! Detail pass: fill description and price from the per-item detail endpoint.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::debug;

use super::paginate::UpstreamFault;
use crate::common::RecordId;
use crate::domains::catalog::models::{Item, ItemUpdate};
use crate::domains::catalog::PipelineSettings;
use crate::kernel::BaseDetailFetcher;

/// Updates built from detail responses, plus the calls that failed.
#[derive(Debug, Clone, Default)]
pub struct DetailPass {
    pub updates: Vec<ItemUpdate>,
    pub faults: Vec<UpstreamFault>,
}

/// Fetch details once per distinct item id.
///
/// Each successful response yields an update with both fields present, so it
/// goes through the merger like any other enrichment. Failed calls produce no
/// update and leave the item's fields unset.
pub async fn fetch_item_details(
    fetcher: &dyn BaseDetailFetcher,
    settings: &PipelineSettings,
    items: &[Item],
) -> DetailPass {
    let mut seen = HashSet::new();
    let ids: Vec<RecordId> = items
        .iter()
        .map(|item| &item.id)
        .filter(|id| seen.insert(id.key()))
        .cloned()
        .collect();

    let responses: Vec<Result<ItemUpdate, UpstreamFault>> = stream::iter(ids)
        .map(|id| async move { item_details(fetcher, settings, &id).await })
        .buffered(settings.detail_concurrency.max(1))
        .collect()
        .await;

    let mut pass = DetailPass::default();
    for response in responses {
        match response {
            Ok(update) => pass.updates.push(update),
            Err(fault) => pass.faults.push(fault),
        }
    }

    debug!(
        fetched = pass.updates.len(),
        failed = pass.faults.len(),
        "Detail pass finished"
    );
    pass
}

async fn item_details(
    fetcher: &dyn BaseDetailFetcher,
    settings: &PipelineSettings,
    id: &RecordId,
) -> Result<ItemUpdate, UpstreamFault> {
    let url = settings.endpoints.item_detail_url(id);
    let timeout = settings.upstream_timeout;

    let reason = match tokio::time::timeout(timeout, fetcher.fetch_details(&url)).await {
        Ok(Ok(details)) => {
            return Ok(ItemUpdate::new(id.clone())
                .with_description(details.description.as_deref())
                .with_price(details.price));
        }
        Ok(Err(e)) => format!("{:#}", e),
        Err(_) => format!("timed out after {:?}", timeout),
    };

    Err(UpstreamFault {
        url,
        page: 1,
        reason,
    })
}
