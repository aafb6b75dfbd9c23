//! Opaque upstream identifiers.
//!
//! Upstream APIs hand out ids as JSON numbers in one payload and strings in
//! another. `RecordId` keeps the original token for output and compares by its
//! stringified form, so `7` and `"7"` name the same record.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(serde_json::Value);

impl RecordId {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    /// Lookup key: strings as-is, everything else via its JSON text.
    pub fn key(&self) -> String {
        match &self.0 {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Null ids and empty strings cannot identify a record.
    pub fn is_usable(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
