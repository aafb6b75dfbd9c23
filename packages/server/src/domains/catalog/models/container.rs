use serde::Deserialize;

use crate::common::RecordId;

/// First-level grouping returned by the container listing.
///
/// Only used to drive the item listing; never cached on its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Container {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
}

impl Container {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}
