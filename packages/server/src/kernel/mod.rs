//! Kernel module - server infrastructure and dependencies.

pub mod cache_store;
pub mod deps;
pub mod keyed_lock;
pub mod persistence;
pub mod test_dependencies;
pub mod traits;

pub use cache_store::{CacheEntry, CacheStore};
pub use deps::{CatalogAdapter, ServerDeps, SystemClock};
pub use keyed_lock::{KeyedGuard, KeyedLocks};
pub use persistence::FilePersistence;
pub use test_dependencies::TestDependencies;
pub use traits::*;
