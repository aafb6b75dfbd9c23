pub mod container;
pub mod item;
pub mod update;

pub use container::Container;
pub use item::{AggregatedResult, Item, ListedItem};
pub use update::{EnrichmentOutcome, EnrichmentRequest, ItemUpdate, RawItemUpdate};
