//! Two-level aggregation: containers for a subject, then items per container.

use futures::stream::{self, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::paginate::{fetch_all_pages, UpstreamFault};
use crate::domains::catalog::models::{AggregatedResult, Container, Item, ListedItem};
use crate::domains::catalog::PipelineSettings;
use crate::kernel::BasePageFetcher;

/// A flattened result plus every upstream fault hit while building it.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub result: AggregatedResult,
    pub faults: Vec<UpstreamFault>,
}

impl Aggregation {
    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Collect every item of every container of `subject`.
///
/// Items keep container order, then page order within a container. Up to
/// `container_concurrency` item listings run at once; results are still
/// concatenated in container order. Upstream failures truncate the affected
/// listing and are reported in `faults`.
pub async fn aggregate(
    fetcher: &dyn BasePageFetcher,
    settings: &PipelineSettings,
    subject: &str,
) -> Aggregation {
    let listing = fetch_all_pages(
        fetcher,
        &settings.endpoints.container_url(subject),
        settings.upstream_timeout,
    )
    .await;

    let mut faults: Vec<UpstreamFault> = listing.fault.into_iter().collect();
    let containers: Vec<Container> = parse_records(listing.records, "container");

    if containers.is_empty() {
        debug!(subject, "Subject has no containers");
        return Aggregation {
            result: AggregatedResult::empty(subject),
            faults,
        };
    }

    let per_container: Vec<(Vec<Item>, Option<UpstreamFault>)> = stream::iter(containers.iter().cloned())
        .map(|container| async move { container_items(fetcher, settings, &container).await })
        .buffered(settings.container_concurrency.max(1))
        .collect()
        .await;

    let mut items = Vec::new();
    for (container_items, fault) in per_container {
        items.extend(container_items);
        faults.extend(fault);
    }

    debug!(
        subject,
        containers = containers.len(),
        items = items.len(),
        "Aggregated items"
    );

    Aggregation {
        result: AggregatedResult {
            subject: subject.to_string(),
            items,
        },
        faults,
    }
}

async fn container_items(
    fetcher: &dyn BasePageFetcher,
    settings: &PipelineSettings,
    container: &Container,
) -> (Vec<Item>, Option<UpstreamFault>) {
    let listing = fetch_all_pages(
        fetcher,
        &settings.endpoints.item_list_url(&container.id),
        settings.upstream_timeout,
    )
    .await;

    let items = parse_records::<ListedItem>(listing.records, "item")
        .into_iter()
        .map(|listed| Item::listed(listed, container))
        .collect();

    (items, listing.fault)
}

/// Decode upstream records, dropping any without a usable id.
fn parse_records<T: DeserializeOwned + HasRecordId>(
    records: Vec<serde_json::Value>,
    kind: &str,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<T>(record) {
            Ok(parsed) if parsed.has_usable_id() => Some(parsed),
            Ok(_) => {
                warn!(kind, "Dropping upstream record with empty id");
                None
            }
            Err(e) => {
                warn!(kind, error = %e, "Dropping malformed upstream record");
                None
            }
        })
        .collect()
}

trait HasRecordId {
    fn has_usable_id(&self) -> bool;
}

impl HasRecordId for Container {
    fn has_usable_id(&self) -> bool {
        self.id.is_usable()
    }
}

impl HasRecordId for ListedItem {
    fn has_usable_id(&self) -> bool {
        self.id.is_usable()
    }
}
