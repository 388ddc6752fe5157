//! Per-store cache wiring
//!
//! A store that caches results holds a [`CacheParams`]: the shared manager
//! plus the key prefix its entries are filed under. Stores built from the
//! same manager share one bounded entry map and one set of statistics.

use crate::CacheManager;
use std::sync::Arc;

/// Handle a store uses to reach the shared cache
#[derive(Debug, Clone)]
pub struct CacheParams {
    /// The cache manager instance
    pub manager: Arc<CacheManager>,
    /// Prefix for cache keys
    pub prefix: String,
}

impl CacheParams {
    /// Wire a store to `manager` under an explicit key prefix
    pub fn new(manager: Arc<CacheManager>, prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            manager,
        }
    }

    /// Wire a store to `manager` under the prefix its config carries
    pub fn shared(manager: Arc<CacheManager>) -> Self {
        let prefix = manager.config().key_prefix.clone();
        Self { manager, prefix }
    }
}
