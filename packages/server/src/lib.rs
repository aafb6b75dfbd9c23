// Catalog Aggregator - API Core
//
// Collects a subject's containers and their items from paginated upstream
// listings, flattens them into one collection, caches it with a TTL and
// accepts out-of-band enrichment of cached items.
//
// Business logic lives in domains/catalog/actions; infrastructure in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
