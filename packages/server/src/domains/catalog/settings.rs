//! Upstream endpoints and pipeline tuning.

use std::time::Duration;

use crate::common::RecordId;

pub const DEFAULT_CONTAINER_LIST_URL: &str =
    "https://games.roproxy.com/v2/users/{subject}/games?limit=50";
pub const DEFAULT_ITEM_LIST_URL: &str =
    "https://games.roproxy.com/v1/games/{container}/game-passes?limit=50";
pub const DEFAULT_ITEM_DETAIL_URL: &str =
    "https://economy.roproxy.com/v2/assets/{item}/details";

/// URL templates for the three upstream calls.
///
/// Placeholders (`{subject}`, `{container}`, `{item}`) are replaced with the
/// percent-encoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub container_list: String,
    pub item_list: String,
    pub item_detail: String,
}

impl Endpoints {
    pub fn container_url(&self, subject: &str) -> String {
        render(&self.container_list, "{subject}", subject)
    }

    pub fn item_list_url(&self, container: &RecordId) -> String {
        render(&self.item_list, "{container}", &container.key())
    }

    pub fn item_detail_url(&self, item: &RecordId) -> String {
        render(&self.item_detail, "{item}", &item.key())
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            container_list: DEFAULT_CONTAINER_LIST_URL.to_string(),
            item_list: DEFAULT_ITEM_LIST_URL.to_string(),
            item_detail: DEFAULT_ITEM_DETAIL_URL.to_string(),
        }
    }
}

fn render(template: &str, placeholder: &str, token: &str) -> String {
    template.replace(placeholder, &urlencoding::encode(token))
}

/// Everything the catalog actions need besides their dependencies.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub endpoints: Endpoints,
    pub cache_ttl: chrono::Duration,
    /// Bound on each upstream call
    pub upstream_timeout: Duration,
    /// Run the detail pass after a fresh aggregation
    pub fetch_item_details: bool,
    pub detail_concurrency: usize,
    pub container_concurrency: usize,
    /// Collapse concurrent misses for one subject into one aggregation
    pub single_flight: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            cache_ttl: chrono::Duration::minutes(5),
            upstream_timeout: Duration::from_secs(10),
            fetch_item_details: true,
            detail_concurrency: 8,
            container_concurrency: 1,
            single_flight: true,
        }
    }
}

impl PipelineSettings {
    /// Short local endpoints, no detail pass.
    pub fn for_tests() -> Self {
        Self {
            endpoints: Endpoints {
                container_list: "http://upstream/users/{subject}/containers?limit=50".to_string(),
                item_list: "http://upstream/containers/{container}/items?limit=50".to_string(),
                item_detail: "http://upstream/items/{item}/details".to_string(),
            },
            fetch_item_details: false,
            ..Self::default()
        }
    }
}
