//! Enrichment merger: explicit-presence partial updates onto cached items.

use std::collections::HashMap;

use crate::domains::catalog::models::{AggregatedResult, ItemUpdate};

/// What a merge touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Updates whose id matched at least one item
    pub updated: usize,
    /// Items in the collection
    pub total: usize,
}

/// Apply `updates` in order to every item sharing each update's id.
///
/// A field is written only when the update carries its key, whatever the
/// value: `price: 0`, `description: ""` and `null` all overwrite. Updates for
/// unknown ids are skipped.
pub fn apply_updates(result: &mut AggregatedResult, updates: &[ItemUpdate]) -> MergeSummary {
    let mut index: HashMap<String, Vec<usize>> = HashMap::with_capacity(result.items.len());
    for (position, item) in result.items.iter().enumerate() {
        index.entry(item.id.key()).or_default().push(position);
    }

    let mut updated = 0;
    for update in updates {
        let Some(positions) = index.get(&update.id.key()) else {
            continue;
        };

        for &position in positions {
            let item = &mut result.items[position];
            update.description.apply_to(&mut item.description);
            update.price.apply_to(&mut item.price);
        }
        updated += 1;
    }

    MergeSummary {
        updated,
        total: result.items.len(),
    }
}
