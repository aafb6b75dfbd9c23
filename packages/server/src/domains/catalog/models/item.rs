use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::Container;
use crate::common::RecordId;

/// Minimal shape read from an item listing record.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedItem {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
}

/// A leaf record tagged with its container.
///
/// `description` and `price` stay unset until enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: RecordId,
    pub name: Option<String>,
    pub container_id: RecordId,
    pub container_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Number>,
}

impl Item {
    pub fn listed(listing: ListedItem, container: &Container) -> Self {
        Self {
            id: listing.id,
            name: listing.name,
            container_id: container.id.clone(),
            container_name: container.name.clone(),
            description: None,
            price: None,
        }
    }
}

/// Flattened items for one subject, in discovery order.
///
/// Duplicate ids from upstream are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub subject: String,
    pub items: Vec<Item>,
}

impl AggregatedResult {
    pub fn empty(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            items: Vec::new(),
        }
    }
}
