//! Cache Module
//!
//! Provides in-memory response caching with TTL expiration.

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{default_key_fn, json_key, KeyFn};
pub use stats::CacheStats;
pub use store::CacheStore;
