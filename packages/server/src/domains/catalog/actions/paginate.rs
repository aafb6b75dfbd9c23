//! Cursor pagination over a single listing endpoint.

use std::time::Duration;

use tracing::debug;

use crate::kernel::BasePageFetcher;

/// Why pagination stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFault {
    /// URL of the request that failed, cursor included
    pub url: String,
    /// 1-based index of the failed page
    pub page: usize,
    pub reason: String,
}

/// Records collected from a listing, plus the fault that cut it short, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCollection {
    pub records: Vec<serde_json::Value>,
    /// Requests issued, including a failed one
    pub requests: usize,
    pub fault: Option<UpstreamFault>,
}

impl PageCollection {
    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }
}

/// Follow continuation cursors until a page has none or a request fails.
///
/// A failure (error, non-success status or timeout) stops pagination and keeps
/// what was collected so far; the failure is returned as `fault` rather than
/// as an error. Pages without a list field contribute nothing but do not stop
/// pagination if they carry a cursor.
pub async fn fetch_all_pages(
    fetcher: &dyn BasePageFetcher,
    url: &str,
    timeout: Duration,
) -> PageCollection {
    let mut collection = PageCollection::default();
    let mut cursor: Option<String> = None;

    loop {
        let page_url = match &cursor {
            Some(cursor) => with_cursor(url, cursor),
            None => url.to_string(),
        };
        collection.requests += 1;

        let reason = match tokio::time::timeout(timeout, fetcher.fetch_page(&page_url)).await {
            Ok(Ok(page)) => {
                debug!(url = %page_url, count = page.items.len(), "Collected page");
                collection.records.extend(page.items);
                cursor = page.next_cursor.filter(|c| !c.is_empty());
                if cursor.is_none() {
                    return collection;
                }
                continue;
            }
            Ok(Err(e)) => format!("{:#}", e),
            Err(_) => format!("timed out after {:?}", timeout),
        };

        collection.fault = Some(UpstreamFault {
            url: page_url,
            page: collection.requests,
            reason,
        });
        return collection;
    }
}

/// Append an escaped cursor to a listing URL.
pub fn with_cursor(url: &str, cursor: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}cursor={}",
        url,
        separator,
        urlencoding::encode(cursor)
    )
}
