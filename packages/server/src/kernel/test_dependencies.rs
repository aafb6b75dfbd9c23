// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// Nothing here touches the network or the filesystem.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{
    BaseCachePersistence, BaseDetailFetcher, BasePageFetcher, CacheStore, Clock, ItemDetails,
    Page, ServerDeps,
};
use crate::domains::catalog::models::AggregatedResult;
use crate::domains::catalog::PipelineSettings;

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Serves canned pages by exact URL. Unknown URLs fail like a 404.
#[derive(Default)]
pub struct MockPageFetcher {
    pages: Mutex<HashMap<String, Page>>,
    failures: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, std::time::Duration>>,
    calls: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, page: Page) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), page);
        self
    }

    /// Make `url` fail with an upstream error.
    pub fn with_failure(self, url: &str) -> Self {
        self.failures.lock().unwrap().insert(url.to_string());
        self
    }

    /// Sleep before answering `url`.
    pub fn with_delay(self, url: &str, delay: std::time::Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    /// Get all URLs that were requested, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.calls.lock().unwrap().push(url.to_string());

        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failures.lock().unwrap().contains(url) {
            anyhow::bail!("API error (503): upstream unavailable");
        }

        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("API error (404): no canned page for {}", url))
    }
}

// =============================================================================
// Mock Detail Fetcher
// =============================================================================

/// Serves canned item details by exact URL. Unknown URLs fail.
#[derive(Default)]
pub struct MockDetailFetcher {
    details: Mutex<HashMap<String, ItemDetails>>,
    calls: Mutex<Vec<String>>,
}

impl MockDetailFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_details(self, url: &str, description: Option<&str>, price: Option<i64>) -> Self {
        self.details.lock().unwrap().insert(
            url.to_string(),
            ItemDetails {
                description: description.map(str::to_string),
                price,
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseDetailFetcher for MockDetailFetcher {
    async fn fetch_details(&self, url: &str) -> Result<ItemDetails> {
        self.calls.lock().unwrap().push(url.to_string());
        self.details
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("API error (404): no canned details for {}", url))
    }
}

// =============================================================================
// Manual Clock
// =============================================================================

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// In-memory Persistence
// =============================================================================

#[derive(Default)]
pub struct MemoryPersistence {
    image: Mutex<Option<Vec<u8>>>,
    fail_saves: Mutex<bool>,
    saves: Mutex<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing image, as if written by a previous process.
    pub fn with_image(image: Vec<u8>) -> Self {
        let persistence = Self::new();
        *persistence.image.lock().unwrap() = Some(image);
        persistence
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }

    pub fn image(&self) -> Option<Vec<u8>> {
        self.image.lock().unwrap().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl BaseCachePersistence for MemoryPersistence {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.image())
    }

    async fn save(&self, image: &[u8]) -> Result<()> {
        if *self.fail_saves.lock().unwrap() {
            anyhow::bail!("disk full");
        }
        *self.image.lock().unwrap() = Some(image.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks with handles kept for assertions.
pub struct TestDependencies {
    pub page_fetcher: Arc<MockPageFetcher>,
    pub detail_fetcher: Arc<MockDetailFetcher>,
    pub clock: Arc<ManualClock>,
    pub persistence: Arc<MemoryPersistence>,
    pub settings: PipelineSettings,
}

impl TestDependencies {
    pub fn new(page_fetcher: MockPageFetcher) -> Self {
        Self {
            page_fetcher: Arc::new(page_fetcher),
            detail_fetcher: Arc::new(MockDetailFetcher::new()),
            clock: Arc::new(ManualClock::default()),
            persistence: Arc::new(MemoryPersistence::new()),
            settings: PipelineSettings::for_tests(),
        }
    }

    pub fn with_detail_fetcher(mut self, detail_fetcher: MockDetailFetcher) -> Self {
        self.detail_fetcher = Arc::new(detail_fetcher);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fresh persistent cache wired to the mock clock and persistence.
    pub fn cache(&self) -> CacheStore<AggregatedResult> {
        CacheStore::new(self.settings.cache_ttl, self.clock.clone())
            .with_persistence(self.persistence.clone())
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.page_fetcher.clone(),
            self.detail_fetcher.clone(),
            Arc::new(self.cache()),
            self.settings.clone(),
        )
    }
}
