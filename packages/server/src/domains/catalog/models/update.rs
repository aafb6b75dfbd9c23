use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::common::{FieldUpdate, RecordId};
use crate::domains::catalog::error::{CatalogError, CatalogResult};

/// Validated partial update for every item sharing `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub id: RecordId,
    pub description: FieldUpdate<String>,
    pub price: FieldUpdate<Number>,
}

impl ItemUpdate {
    /// An update that touches nothing until fields are added.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            description: FieldUpdate::Absent,
            price: FieldUpdate::Absent,
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = FieldUpdate::Present(description.map(str::to_string));
        self
    }

    pub fn with_price(mut self, price: Option<i64>) -> Self {
        self.price = FieldUpdate::Present(price.map(Number::from));
        self
    }
}

/// One entry of an inbound enrichment body, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItemUpdate {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default)]
    pub price: FieldUpdate<Number>,
}

/// Inbound enrichment body: `{ "updates": [{ "id": .., "price": .. }, ..] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrichmentRequest {
    #[serde(default)]
    pub updates: Option<Vec<RawItemUpdate>>,
}

impl EnrichmentRequest {
    pub fn new(updates: Vec<RawItemUpdate>) -> Self {
        Self {
            updates: Some(updates),
        }
    }

    /// Reject the whole request if `updates` is missing or any entry lacks an id.
    pub fn into_updates(self) -> CatalogResult<Vec<ItemUpdate>> {
        let raw = self
            .updates
            .ok_or_else(|| CatalogError::invalid("missing `updates` array"))?;

        raw.into_iter()
            .enumerate()
            .map(|(index, update)| match update.id {
                Some(id) if id.is_usable() => Ok(ItemUpdate {
                    id,
                    description: update.description,
                    price: update.price,
                }),
                _ => Err(CatalogError::invalid(format!(
                    "update #{} is missing `id`",
                    index
                ))),
            })
            .collect()
    }
}

/// Response to an enrichment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentOutcome {
    pub ok: bool,
    /// Updates that matched at least one cached item
    pub updated: usize,
    /// Items in the cached collection
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> CatalogResult<Vec<ItemUpdate>> {
        serde_json::from_value::<EnrichmentRequest>(body)
            .unwrap()
            .into_updates()
    }

    #[test]
    fn test_explicit_fields_survive_parsing() {
        let updates = parse(json!({
            "updates": [
                {"id": 7, "price": 0},
                {"id": "8", "description": ""},
                {"id": 9}
            ]
        }))
        .unwrap();

        assert_eq!(updates[0], ItemUpdate::new(7).with_price(Some(0)));
        assert_eq!(updates[1], ItemUpdate::new("8").with_description(Some("")));
        assert_eq!(updates[2], ItemUpdate::new(9));
    }

    #[test]
    fn test_fractional_price_is_kept() {
        let updates = parse(json!({"updates": [{"id": 1, "price": 9.5}]})).unwrap();

        assert_eq!(
            updates[0].price,
            FieldUpdate::set(Number::from_f64(9.5).unwrap())
        );
    }

    #[test]
    fn test_missing_updates_array() {
        let err = parse(json!({})).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequest { .. }));
    }

    #[test]
    fn test_missing_id_rejects_whole_request() {
        let err = parse(json!({
            "updates": [{"id": 1, "price": 5}, {"price": 10}]
        }))
        .unwrap_err();

        match err {
            CatalogError::InvalidRequest { reason } => assert!(reason.contains("#1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_id_is_missing() {
        let err = parse(json!({"updates": [{"id": null, "price": 1}]})).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequest { .. }));
    }
}
