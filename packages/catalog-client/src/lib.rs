//! Pure catalog REST API client.
//!
//! A minimal client for cursor-paginated listing endpoints and per-item
//! detail endpoints. Callers build the URLs; the client only knows the wire
//! shapes (`{ data, nextPageCursor }` pages and asset detail objects).
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_client::CatalogClient;
//! use std::time::Duration;
//!
//! let client = CatalogClient::new(Duration::from_secs(10))?;
//!
//! let page = client
//!     .fetch_page("https://games.roproxy.com/v2/users/1/games?limit=50")
//!     .await?;
//! println!("{} games, more: {}", page.items.len(), page.next_cursor.is_some());
//! ```

pub mod error;
pub mod types;

pub use error::{ClientError, Result};
pub use types::{ItemDetails, Page};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::{DetailPayload, PagePayload};

const USER_AGENT: &str = "catalog-client/0.1";

pub struct CatalogClient {
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client whose requests are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a single listing page.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let payload: PagePayload = self.get_json(url).await?;
        let page = Page::from(payload);
        tracing::debug!(
            url,
            count = page.items.len(),
            has_more = page.next_cursor.is_some(),
            "Fetched listing page"
        );
        Ok(page)
    }

    /// Fetch description and price for one item.
    pub async fn fetch_item_details(&self, url: &str) -> Result<ItemDetails> {
        let payload: DetailPayload = self.get_json(url).await?;
        Ok(ItemDetails::from(payload))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}
