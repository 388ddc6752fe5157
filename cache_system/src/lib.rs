//! Cache system for in-process result caching
//!
//! This crate provides bounded in-memory caching of records, query results
//! and counts, with per-table invalidation and hit/miss statistics.

pub mod errors;
pub mod manager;
pub mod params;
pub mod prelude;

// Re-export centralized config
pub use config::CacheConfig;

pub use errors::CacheError;
pub use manager::{CacheManager, CacheStats};
pub use params::CacheParams;
