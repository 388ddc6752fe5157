//! Cache manager implementation
//!
//! This module provides the main CacheManager struct
//! for in-process result caching and invalidation.

use crate::errors::CacheError;
use config::CacheConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Hit and miss counters plus the current entry count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} hits, {} misses, {} entries",
            self.hits, self.misses, self.entries
        )
    }
}

#[derive(Debug)]
struct CacheEntry {
    payload: String,
    seq: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    generations: HashMap<String, u64>,
    seq: u64,
}

/// In-process cache manager shared by all stores
#[derive(Clone)]
pub struct CacheManager {
    inner: Arc<RwLock<CacheInner>>,
    config: Arc<CacheConfig>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = match self.inner.try_read() {
            Ok(inner) => inner.entries.len().to_string(),
            Err(_) => "locked".to_string(),
        };

        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("entries", &entries)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            config: Arc::new(config),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Generate cache key for record by ID
    fn build_record_key(&self, prefix: &str, table_name: &str, id: &str) -> String {
        format!("{}:{}:record:{}", prefix, table_name, id)
    }

    /// Generate cache key for query results
    fn build_query_key(&self, prefix: &str, table_name: &str, query_hash: &str) -> String {
        format!("{}:{}:query:{}", prefix, table_name, query_hash)
    }

    /// Generate cache key for query counts
    fn build_count_key(&self, prefix: &str, table_name: &str, query_hash: &str) -> String {
        format!("{}:{}:count:{}", prefix, table_name, query_hash)
    }

    /// Namespace under which a table tracks its invalidation generation
    fn namespace(&self, prefix: &str, table_name: &str) -> String {
        format!("{}:{}", prefix, table_name)
    }

    /// Generate hash for query parameters
    pub fn hash_query<T: Hash>(&self, query: &T) -> String {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }

    /// Current invalidation generation for a table.
    ///
    /// Callers capture this before running a database query and pass it back
    /// when storing the result; the store is skipped if the table was
    /// invalidated in between.
    pub async fn generation(&self, prefix: &str, table_name: &str) -> u64 {
        let namespace = self.namespace(prefix, table_name);
        let inner = self.inner.read().await;
        inner.generations.get(&namespace).copied().unwrap_or(0)
    }

    fn insert_entry(&self, inner: &mut CacheInner, key: String, payload: String) {
        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.config.max_entries {
            // Evict the entry that has sat in the cache the longest
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                inner.entries.remove(&oldest);
            }
        }

        inner.seq += 1;
        let seq = inner.seq;
        inner.entries.insert(key, CacheEntry { payload, seq });
    }

    fn bump_generation(inner: &mut CacheInner, namespace: String) {
        *inner.generations.entry(namespace).or_insert(0) += 1;
    }

    fn is_stale(&self, inner: &CacheInner, namespace: &str, observed_generation: u64) -> bool {
        inner.generations.get(namespace).copied().unwrap_or(0) != observed_generation
    }

    /// Get single record from cache by ID
    pub async fn get_record<T>(
        &self,
        prefix: &str,
        table_name: &str,
        id: &str,
    ) -> Result<Option<T>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let cache_key = self.build_record_key(prefix, table_name, id);
        let inner = self.inner.read().await;

        match inner.entries.get(&cache_key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let value: T = serde_json::from_str(&entry.payload)?;
                Ok(Some(value))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Set single record in cache by ID.
    ///
    /// Returns `false` without storing when the table generation moved past
    /// `observed_generation`, meaning a write invalidated the table after the
    /// value was read.
    pub async fn set_record<T>(
        &self,
        prefix: &str,
        table_name: &str,
        id: &str,
        value: &T,
        observed_generation: u64,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        let cache_key = self.build_record_key(prefix, table_name, id);
        let payload = serde_json::to_string(value)?;
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        if self.is_stale(&inner, &namespace, observed_generation) {
            return Ok(false);
        }

        self.insert_entry(&mut inner, cache_key, payload);
        Ok(true)
    }

    /// Get query results from cache
    pub async fn get_query<T>(
        &self,
        prefix: &str,
        table_name: &str,
        query_hash: &str,
    ) -> Result<Option<Vec<T>>, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let cache_key = self.build_query_key(prefix, table_name, query_hash);
        let inner = self.inner.read().await;

        match inner.entries.get(&cache_key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let values: Vec<T> = serde_json::from_str(&entry.payload)?;
                Ok(Some(values))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Set query results in cache, subject to the same generation check as
    /// [`set_record`](Self::set_record)
    pub async fn set_query<T>(
        &self,
        prefix: &str,
        table_name: &str,
        query_hash: &str,
        results: &[T],
        observed_generation: u64,
    ) -> Result<bool, CacheError>
    where
        T: Serialize,
    {
        let cache_key = self.build_query_key(prefix, table_name, query_hash);
        let payload = serde_json::to_string(results)?;
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        if self.is_stale(&inner, &namespace, observed_generation) {
            return Ok(false);
        }

        self.insert_entry(&mut inner, cache_key, payload);
        Ok(true)
    }

    /// Get a cached scalar count for a query
    pub async fn get_count(
        &self,
        prefix: &str,
        table_name: &str,
        query_hash: &str,
    ) -> Result<Option<i64>, CacheError> {
        let cache_key = self.build_count_key(prefix, table_name, query_hash);
        let inner = self.inner.read().await;

        match inner.entries.get(&cache_key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let value: i64 = serde_json::from_str(&entry.payload)?;
                Ok(Some(value))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    /// Cache a scalar count for a query, subject to the generation check
    pub async fn set_count(
        &self,
        prefix: &str,
        table_name: &str,
        query_hash: &str,
        count: i64,
        observed_generation: u64,
    ) -> Result<bool, CacheError> {
        let cache_key = self.build_count_key(prefix, table_name, query_hash);
        let payload = serde_json::to_string(&count)?;
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        if self.is_stale(&inner, &namespace, observed_generation) {
            return Ok(false);
        }

        self.insert_entry(&mut inner, cache_key, payload);
        Ok(true)
    }

    /// Delete specific record from cache.
    ///
    /// Bumps the table generation so racing readers do not restore the
    /// removed record.
    pub async fn delete_record(&self, prefix: &str, table_name: &str, id: &str) -> bool {
        let cache_key = self.build_record_key(prefix, table_name, id);
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        let removed = inner.entries.remove(&cache_key).is_some();
        Self::bump_generation(&mut inner, namespace);
        removed
    }

    /// Invalidate all query results and counts for a table, leaving cached
    /// records in place
    pub async fn invalidate_queries(&self, prefix: &str, table_name: &str) -> usize {
        let query_pattern = format!("{}:{}:query:", prefix, table_name);
        let count_pattern = format!("{}:{}:count:", prefix, table_name);
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        let before = inner.entries.len();
        inner
            .entries
            .retain(|key, _| !key.starts_with(&query_pattern) && !key.starts_with(&count_pattern));
        Self::bump_generation(&mut inner, namespace);
        before - inner.entries.len()
    }

    /// Full invalidation for a table (records + queries)
    pub async fn invalidate_table(&self, prefix: &str, table_name: &str) -> usize {
        // Trailing colon keeps "patient" from matching "patients"
        let pattern = format!("{}:{}:", prefix, table_name);
        let namespace = self.namespace(prefix, table_name);
        let mut inner = self.inner.write().await;

        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(&pattern));
        Self::bump_generation(&mut inner, namespace);
        before - inner.entries.len()
    }

    /// Snapshot of the hit and miss counters and the entry count
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: inner.entries.len(),
        }
    }

    /// Reset the hit and miss counters
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
