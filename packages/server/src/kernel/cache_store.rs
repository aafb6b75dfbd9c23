//! TTL cache with optional write-through persistence.
//!
//! One `CacheStore` is built per process and shared behind an `Arc`. All
//! reads and writes go through a single async mutex, which also covers the
//! persistence flush, so concurrent mutations can't interleave their images.
//!
//! Expiry is lazy: an entry past its deadline is invisible to readers and is
//! removed the next time its key is touched. There is no background sweep.
//!
//! A mutation commits only when the in-memory change and the image flush both
//! succeed. A failed flush rolls the in-memory change back.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::traits::{BaseCachePersistence, Clock};

/// A cached value and the instant it stops being visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: DateTime<Utc>,
}

pub struct CacheStore<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    persistence: Option<Arc<dyn BaseCachePersistence>>,
}

impl<V> CacheStore<V>
where
    V: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Create an empty, memory-only store.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            persistence: None,
        }
    }

    /// Flush every future mutation to `persistence`. Does not read it.
    pub fn with_persistence(mut self, persistence: Arc<dyn BaseCachePersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Create a persistent store, seeded from the saved image.
    ///
    /// An unreadable or malformed image is logged and treated as empty.
    pub async fn load(
        ttl: Duration,
        clock: Arc<dyn Clock>,
        persistence: Arc<dyn BaseCachePersistence>,
    ) -> Self {
        let entries = match persistence.load().await {
            Ok(Some(bytes)) => match serde_json::from_slice::<HashMap<String, CacheEntry<V>>>(&bytes)
            {
                Ok(entries) => {
                    info!(count = entries.len(), "Loaded persisted cache image");
                    entries
                }
                Err(e) => {
                    warn!(error = %e, "Persisted cache image is malformed, starting empty");
                    HashMap::new()
                }
            },
            Ok(None) => {
                debug!("No persisted cache image, starting empty");
                HashMap::new()
            }
            Err(e) => {
                warn!(error = %e, "Persisted cache image is unreadable, starting empty");
                HashMap::new()
            }
        };

        Self {
            entries: Mutex::new(entries),
            ttl,
            clock,
            persistence: Some(persistence),
        }
    }

    /// Get a live value, evicting the entry if it has expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.entry(key).await.map(|entry| entry.value)
    }

    /// Get a live entry together with its deadline.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();

        match entries.get(key) {
            None => return None,
            Some(entry) if now < entry.expires_at => return Some(entry.clone()),
            Some(_) => {}
        }

        self.evict_expired(&mut entries, key).await;
        None
    }

    /// Store `value` with a fresh deadline, replacing any previous entry.
    pub async fn set(&self, key: &str, value: V) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let entry = CacheEntry {
            value,
            expires_at: self.deadline_from(self.clock.now()),
        };
        let previous = entries.insert(key.to_string(), entry);

        if let Err(e) = self.flush(&entries).await {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }

        debug!(key, "Cache entry stored");
        Ok(())
    }

    /// Mutate a live value in place and refresh its deadline.
    ///
    /// Returns `Ok(None)` without calling `apply` when the key is absent or
    /// expired.
    pub async fn update<R, F>(&self, key: &str, apply: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut V) -> R,
    {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();

        let live = match entries.get(key) {
            None => return Ok(None),
            Some(entry) => now < entry.expires_at,
        };
        if !live {
            self.evict_expired(&mut entries, key).await;
            return Ok(None);
        }

        let deadline = self.deadline_from(now);
        let (outcome, snapshot) = match entries.get_mut(key) {
            Some(entry) => {
                let snapshot = self.persistence.as_ref().map(|_| entry.clone());
                let outcome = apply(&mut entry.value);
                entry.expires_at = deadline;
                (outcome, snapshot)
            }
            None => return Ok(None),
        };

        if let Err(e) = self.flush(&entries).await {
            if let Some(snapshot) = snapshot {
                entries.insert(key.to_string(), snapshot);
            }
            return Err(e);
        }

        Ok(Some(outcome))
    }

    /// Remove an entry. Returns whether a live entry was removed.
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();

        let Some(removed) = entries.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.flush(&entries).await {
            entries.insert(key.to_string(), removed);
            return Err(e);
        }

        Ok(now < removed.expires_at)
    }

    /// Number of entries still visible to readers.
    pub async fn live_count(&self) -> usize {
        let entries = self.entries.lock().await;
        let now = self.clock.now();
        entries.values().filter(|e| now < e.expires_at).count()
    }

    fn deadline_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    async fn evict_expired(&self, entries: &mut HashMap<String, CacheEntry<V>>, key: &str) {
        entries.remove(key);
        debug!(key, "Evicted expired cache entry");

        // The entry is gone from memory either way; a stale image only
        // resurrects an already-expired entry on restart.
        if let Err(e) = self.flush(entries).await {
            warn!(key, error = %e, "Failed to persist cache after eviction");
        }
    }

    async fn flush(&self, entries: &HashMap<String, CacheEntry<V>>) -> Result<()> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };

        let image = serde_json::to_vec(entries).context("Failed to serialize cache image")?;
        persistence
            .save(&image)
            .await
            .context("Failed to persist cache image")
    }
}
