//! Catalog domain - aggregates a subject's containers and their items
//!
//! Flow:
//!   request → cache lookup → (miss) paginate containers → paginate items per
//!   container → flatten → optional detail pass → cache → response
//!
//! Enrichment requests patch cached items in place; they never create a
//! collection.

pub mod actions;
pub mod error;
pub mod models;
pub mod settings;

pub use error::CatalogError;
pub use models::{AggregatedResult, Container, EnrichmentOutcome, EnrichmentRequest, Item, ItemUpdate};
pub use settings::{Endpoints, PipelineSettings};
