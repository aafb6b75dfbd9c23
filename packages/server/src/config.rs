use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::catalog::settings::{
    DEFAULT_CONTAINER_LIST_URL, DEFAULT_ITEM_DETAIL_URL, DEFAULT_ITEM_LIST_URL,
};
use crate::domains::catalog::{Endpoints, PipelineSettings};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cache_ttl_secs: u32,
    /// Persisted cache image; memory-only when unset
    pub cache_persist_path: Option<PathBuf>,
    pub container_list_url: String,
    pub item_list_url: String,
    pub item_detail_url: String,
    pub upstream_timeout_secs: u64,
    pub fetch_item_details: bool,
    pub detail_concurrency: usize,
    pub container_concurrency: usize,
    pub single_flight: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            port: parse(&lookup, "PORT", 3000)?,
            cache_ttl_secs: parse(&lookup, "CACHE_TTL_SECS", 300)?,
            cache_persist_path: lookup("CACHE_PERSIST_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            container_list_url: text("CONTAINER_LIST_URL", DEFAULT_CONTAINER_LIST_URL),
            item_list_url: text("ITEM_LIST_URL", DEFAULT_ITEM_LIST_URL),
            item_detail_url: text("ITEM_DETAIL_URL", DEFAULT_ITEM_DETAIL_URL),
            upstream_timeout_secs: parse(&lookup, "UPSTREAM_TIMEOUT_SECS", 10)?,
            fetch_item_details: parse(&lookup, "FETCH_ITEM_DETAILS", true)?,
            detail_concurrency: parse(&lookup, "DETAIL_CONCURRENCY", 8)?,
            container_concurrency: parse(&lookup, "CONTAINER_CONCURRENCY", 1)?,
            single_flight: parse(&lookup, "SINGLE_FLIGHT", true)?,
        };

        anyhow::ensure!(config.cache_ttl_secs > 0, "CACHE_TTL_SECS must be positive");
        anyhow::ensure!(
            config.upstream_timeout_secs > 0,
            "UPSTREAM_TIMEOUT_SECS must be positive"
        );
        anyhow::ensure!(config.detail_concurrency > 0, "DETAIL_CONCURRENCY must be positive");
        anyhow::ensure!(
            config.container_concurrency > 0,
            "CONTAINER_CONCURRENCY must be positive"
        );

        Ok(config)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            endpoints: Endpoints {
                container_list: self.container_list_url.clone(),
                item_list: self.item_list_url.clone(),
                item_detail: self.item_detail_url.clone(),
            },
            cache_ttl: chrono::Duration::seconds(i64::from(self.cache_ttl_secs)),
            upstream_timeout: Duration::from_secs(self.upstream_timeout_secs),
            fetch_item_details: self.fetch_item_details,
            detail_concurrency: self.detail_concurrency,
            container_concurrency: self.container_concurrency,
            single_flight: self.single_flight,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid {}", name, std::any::type_name::<T>())),
        None => Ok(default),
    }
}
