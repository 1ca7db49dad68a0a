//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and FIFO eviction.

mod entry;
mod fifo;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fifo::InsertionOrder;
pub use stats::{hit_rate, CacheStats};
pub use store::CacheStore;

// == Public Constants ==
/// Capacity of the process-wide cache in the reference deployment
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// TTL in seconds applied when a caller does not pass one
pub const DEFAULT_TTL_SECS: u64 = 300;
