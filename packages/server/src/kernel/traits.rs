// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Pagination, aggregation and merging are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BasePageFetcher, BaseCachePersistence)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use catalog_client::{ItemDetails, Page};

// =============================================================================
// Upstream Listing Trait (Infrastructure - one page of a cursor listing)
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch one page. Any error (status, transport, decode) ends pagination.
    async fn fetch_page(&self, url: &str) -> Result<Page>;
}

// =============================================================================
// Upstream Detail Trait (Infrastructure - per-item description/price)
// =============================================================================

#[async_trait]
pub trait BaseDetailFetcher: Send + Sync {
    async fn fetch_details(&self, url: &str) -> Result<ItemDetails>;
}

// =============================================================================
// Cache Persistence Trait (Infrastructure - durable cache image)
// =============================================================================

/// Byte-level storage for the full cache image.
///
/// Implementations store exactly one image; `save` replaces it wholesale.
#[async_trait]
pub trait BaseCachePersistence: Send + Sync {
    /// Read the stored image. `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored image. Must not return before the write is durable.
    async fn save(&self, image: &[u8]) -> Result<()>;
}

// =============================================================================
// Clock Trait (Infrastructure - injectable time source)
// =============================================================================

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
