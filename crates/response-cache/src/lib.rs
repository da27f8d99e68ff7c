//! Namespace-scoped response cache
//!
//! Stores response snapshots keyed by request identity (method + URL) inside
//! a named cache namespace. Distinct namespace identifiers are disjoint
//! buckets; bumping the identifier is the only invalidation mechanism, and
//! abandoned buckets are left for an external cleanup step.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{CacheError, Result};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::ResponseStore;
pub use types::{CacheStats, CachedResponse, RequestKey};
