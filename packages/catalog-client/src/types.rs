use serde::Deserialize;

/// Raw listing payload as returned by the upstream API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagePayload {
    #[serde(default)]
    pub data: Option<Vec<serde_json::Value>>,
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: Option<String>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<serde_json::Value>,
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(items: Vec<serde_json::Value>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Final page: no continuation cursor.
    pub fn last(items: Vec<serde_json::Value>) -> Self {
        Self::new(items, None)
    }
}

impl From<PagePayload> for Page {
    fn from(payload: PagePayload) -> Self {
        // A page without `data` is empty but may still carry a cursor.
        Self {
            items: payload.data.unwrap_or_default(),
            next_cursor: payload.next_page_cursor.filter(|c| !c.is_empty()),
        }
    }
}

/// Raw asset detail payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailPayload {
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "PriceInRobux", default)]
    pub price_in_robux: Option<i64>,
}

/// Description and price of a single item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDetails {
    pub description: Option<String>,
    pub price: Option<i64>,
}

impl From<DetailPayload> for ItemDetails {
    fn from(payload: DetailPayload) -> Self {
        Self {
            description: payload.description.filter(|d| !d.is_empty()),
            price: payload.price_in_robux,
        }
    }
}
