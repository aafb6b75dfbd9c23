//! Catalog domain actions - business logic functions
//!
//! Actions are async functions called directly from HTTP handlers with the
//! shared `ServerDeps`. Upstream failures degrade results; only validation and
//! missing-precondition failures come back as `CatalogError`.

mod apply_enrichment;
mod get_aggregated;
mod invalidate;

pub mod aggregate;
pub mod details;
pub mod merge;
pub mod paginate;

pub use aggregate::{aggregate, Aggregation};
pub use apply_enrichment::apply_enrichment;
pub use details::{fetch_item_details, DetailPass};
pub use get_aggregated::get_aggregated;
pub use invalidate::invalidate_aggregate;
pub use merge::{apply_updates, MergeSummary};
pub use paginate::{fetch_all_pages, PageCollection, UpstreamFault};

use crate::domains::catalog::error::{CatalogError, CatalogResult};

/// Subjects are opaque, but an empty one can't name anything.
fn validate_subject(subject: &str) -> CatalogResult<&str> {
    if subject.trim().is_empty() {
        return Err(CatalogError::invalid("subject must not be empty"));
    }
    Ok(subject)
}
