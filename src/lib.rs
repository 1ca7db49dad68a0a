//! Sieve Cache - record filtering and a bounded TTL cache
//!
//! Provides Sieve-style filter evaluation over JSON records and an in-memory
//! cache with TTL expiration and FIFO eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod sieve;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore};
pub use config::Config;
pub use sieve::{evaluate_filter, evaluate_filters, FilterCondition, FilterSet, Operator};
pub use tasks::spawn_cleanup_task;
