//! Cache Module
//!
//! Provides the in-memory TTL response cache with bounded capacity and
//! batch eviction, plus deterministic cache-key generation.

mod entry;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{generate_key, Params};
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Default maximum number of entries the cache can hold
pub const MAX_CAPACITY: usize = 1000;

/// Fraction of capacity evicted in one batch when the cache is full
pub const EVICTION_FRACTION: f64 = 0.1;
