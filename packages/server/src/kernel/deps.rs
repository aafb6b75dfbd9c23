//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container passed to every
//! catalog action. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use catalog_client::CatalogClient;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domains::catalog::models::AggregatedResult;
use crate::domains::catalog::PipelineSettings;
use crate::kernel::{
    BaseDetailFetcher, BasePageFetcher, CacheStore, Clock, ItemDetails, KeyedLocks, Page,
};

// =============================================================================
// CatalogClient Adapter (implements the upstream fetcher traits)
// =============================================================================

/// Wrapper around CatalogClient that implements the fetcher traits
pub struct CatalogAdapter(pub Arc<CatalogClient>);

impl CatalogAdapter {
    pub fn new(client: Arc<CatalogClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BasePageFetcher for CatalogAdapter {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.0.fetch_page(url).await.map_err(Into::into)
    }
}

#[async_trait]
impl BaseDetailFetcher for CatalogAdapter {
    async fn fetch_details(&self, url: &str) -> Result<ItemDetails> {
        self.0.fetch_item_details(url).await.map_err(Into::into)
    }
}

// =============================================================================
// System Clock
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub page_fetcher: Arc<dyn BasePageFetcher>,
    pub detail_fetcher: Arc<dyn BaseDetailFetcher>,
    /// Aggregated results keyed by subject
    pub cache: Arc<CacheStore<AggregatedResult>>,
    /// Per-subject locks for single-flight aggregation
    pub aggregation_locks: Arc<KeyedLocks>,
    pub settings: PipelineSettings,
}

impl ServerDeps {
    pub fn new(
        page_fetcher: Arc<dyn BasePageFetcher>,
        detail_fetcher: Arc<dyn BaseDetailFetcher>,
        cache: Arc<CacheStore<AggregatedResult>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            page_fetcher,
            detail_fetcher,
            cache,
            aggregation_locks: Arc::new(KeyedLocks::new()),
            settings,
        }
    }

    /// Both fetchers backed by one catalog client.
    pub fn from_client(
        client: Arc<CatalogClient>,
        cache: Arc<CacheStore<AggregatedResult>>,
        settings: PipelineSettings,
    ) -> Self {
        let adapter = Arc::new(CatalogAdapter::new(client));
        Self::new(adapter.clone(), adapter, cache, settings)
    }
}
