//! Generic cached store
//!
//! This module provides the generic store every entity shares: validated
//! writes, cached reads, and classified errors. Entities plug in through
//! the [`Record`] and [`Persist`] traits; callers depend on the
//! [`SearchStore`] capability.

use crate::errors::{StoreError, classify};
use crate::query::{
    QueryFingerprint, SearchTerm, SortKey, SortOrder, build_limit_clause, build_order_clause,
    build_where_clause,
};
use crate::validate::{Validate, Validation};
use async_trait::async_trait;
use cache_system::CacheParams;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};
use std::marker::PhantomData;

/// Column metadata an entity provides about its table
pub trait Record:
    Clone + Send + Sync + Unpin + Serialize + DeserializeOwned + for<'r> FromRow<'r, MySqlRow>
{
    /// Allow-listed sortable columns for this entity
    type Sort: SortKey + Send + Sync;

    fn table_name() -> &'static str;
    fn id_column() -> &'static str;
    fn search_columns() -> &'static [&'static str];

    /// Database identity, if the model has been persisted
    fn id(&self) -> Option<i64>;
}

/// Write statements an entity wires to its own columns
#[async_trait]
pub trait Persist {
    /// Insert a new row, returning the database-assigned id
    async fn insert(&self, pool: &MySqlPool) -> Result<i64, sqlx::Error>;

    /// Update the row addressed by the model's id, returning rows affected
    async fn update(&self, pool: &MySqlPool) -> Result<u64, sqlx::Error>;
}

/// Caller-facing capability of a concrete entity store.
///
/// The controller and tests depend on this trait, not on [`EntityStore`],
/// so a store can be substituted without touching its callers.
#[async_trait]
pub trait SearchStore: Send + Sync {
    type Model: Record;

    /// Number of rows matching the term
    async fn count(&self, term: &SearchTerm) -> Result<i64, StoreError>;

    /// One page of rows matching the term, in the requested order
    async fn search(
        &self,
        term: &SearchTerm,
        sort: <Self::Model as Record>::Sort,
        order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Self::Model>, StoreError>;

    /// Fetch a single row by id
    async fn get(&self, id: i64) -> Result<Option<Self::Model>, StoreError>;

    /// Validate and persist, returning the row's id.
    ///
    /// A model without identity is inserted; one with identity is updated.
    async fn save(&self, model: &Self::Model) -> Result<i64, StoreError>;

    /// Delete by id; deleting an absent row is an error
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Generic store that provides the [`SearchStore`] operations for any
/// entity implementing the metadata traits
#[derive(Clone)]
pub struct EntityStore<T: Record> {
    pub(crate) pool: MySqlPool,
    pub(crate) cache: Option<CacheParams>,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T: Record> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("table", &T::table_name())
            .field("has_cache", &self.has_cache())
            .finish()
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new(pool: MySqlPool, cache: Option<CacheParams>) -> Self {
        Self {
            pool,
            cache,
            _phantom: PhantomData,
        }
    }

    /// Check if a cache is wired into this store
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Flush every cached entry for this table after a write
    pub(crate) async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            let removed = cache
                .manager
                .invalidate_table(&cache.prefix, T::table_name())
                .await;
            tracing::debug!("[CACHE] {}: flushed {} entries", T::table_name(), removed);
        }
    }
}

// Bind a serde_json parameter onto a query with the matching native type
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            serde_json::Value::Number(n) => $query.bind(n.as_i64().unwrap_or_default()),
            serde_json::Value::String(s) => $query.bind(s),
            other => $query.bind(other.to_string()),
        }
    };
}

#[async_trait]
impl<T> SearchStore for EntityStore<T>
where
    T: Record + Persist + Validate,
{
    type Model = T;

    async fn count(&self, term: &SearchTerm) -> Result<i64, StoreError> {
        let fingerprint = QueryFingerprint::count(term);

        let mut observed_generation = 0;
        let mut query_hash = String::new();
        if let Some(cache) = &self.cache {
            query_hash = cache.manager.hash_query(&fingerprint);
            if let Some(total) = cache
                .manager
                .get_count(&cache.prefix, T::table_name(), &query_hash)
                .await?
            {
                return Ok(total);
            }
            observed_generation = cache.manager.generation(&cache.prefix, T::table_name()).await;
        }

        let (where_clause, params) = build_where_clause(term, T::id_column(), T::search_columns());
        let mut sql = format!("SELECT COUNT(*) AS total FROM {}", T::table_name());
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }

        tracing::debug!("[COUNT] {}: {}", T::table_name(), sql);

        let mut query = sqlx::query(&sql);
        for param in params {
            query = bind_json_param!(query, param);
        }

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(T::table_name(), e))?;
        let total: i64 = row.get("total");

        if let Some(cache) = &self.cache {
            cache
                .manager
                .set_count(
                    &cache.prefix,
                    T::table_name(),
                    &query_hash,
                    total,
                    observed_generation,
                )
                .await?;
        }

        Ok(total)
    }

    async fn search(
        &self,
        term: &SearchTerm,
        sort: T::Sort,
        order: SortOrder,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<T>, StoreError> {
        let fingerprint = QueryFingerprint::search(term, sort.column(), order, limit, offset);

        let mut observed_generation = 0;
        let mut query_hash = String::new();
        if let Some(cache) = &self.cache {
            query_hash = cache.manager.hash_query(&fingerprint);
            if let Some(rows) = cache
                .manager
                .get_query::<T>(&cache.prefix, T::table_name(), &query_hash)
                .await?
            {
                return Ok(rows);
            }
            observed_generation = cache.manager.generation(&cache.prefix, T::table_name()).await;
        }

        let (where_clause, params) = build_where_clause(term, T::id_column(), T::search_columns());
        let order_clause = build_order_clause(sort.column(), order);
        let limit_clause = build_limit_clause(limit, offset);

        let mut sql = format!("SELECT * FROM {}", T::table_name());
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }
        sql.push(' ');
        sql.push_str(&order_clause);
        sql.push(' ');
        sql.push_str(&limit_clause);

        tracing::debug!("[SEARCH] {}: {}", T::table_name(), sql);

        let mut query = sqlx::query_as::<_, T>(&sql);
        for param in params {
            query = bind_json_param!(query, param);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(T::table_name(), e))?;

        if let Some(cache) = &self.cache {
            cache
                .manager
                .set_query(
                    &cache.prefix,
                    T::table_name(),
                    &query_hash,
                    &rows,
                    observed_generation,
                )
                .await?;
        }

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<T>, StoreError> {
        let id_key = id.to_string();

        let mut observed_generation = 0;
        if let Some(cache) = &self.cache {
            if let Some(record) = cache
                .manager
                .get_record::<T>(&cache.prefix, T::table_name(), &id_key)
                .await?
            {
                return Ok(Some(record));
            }
            observed_generation = cache.manager.generation(&cache.prefix, T::table_name()).await;
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?",
            T::table_name(),
            T::id_column()
        );
        let result = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(T::table_name(), e))?;

        if let (Some(record), Some(cache)) = (&result, &self.cache) {
            cache
                .manager
                .set_record(
                    &cache.prefix,
                    T::table_name(),
                    &id_key,
                    record,
                    observed_generation,
                )
                .await?;
        }

        Ok(result)
    }

    async fn save(&self, model: &T) -> Result<i64, StoreError> {
        // Validation happens before any I/O
        if let Validation::Invalid(message) = model.validate() {
            return Err(StoreError::Validation(message));
        }

        let id = match model.id() {
            None => {
                let id = model
                    .insert(&self.pool)
                    .await
                    .map_err(|e| classify(T::table_name(), e))?;
                tracing::debug!("[SAVE] {}: inserted id {}", T::table_name(), id);
                id
            }
            Some(id) => {
                let affected = model
                    .update(&self.pool)
                    .await
                    .map_err(|e| classify(T::table_name(), e))?;
                if affected == 0 {
                    return Err(StoreError::NotFound {
                        table: T::table_name(),
                        id,
                    });
                }
                tracing::debug!("[SAVE] {}: updated id {}", T::table_name(), id);
                id
            }
        };

        self.invalidate().await;
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            T::table_name(),
            T::id_column()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(T::table_name(), e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                table: T::table_name(),
                id,
            });
        }

        tracing::debug!("[DELETE] {}: removed id {}", T::table_name(), id);
        self.invalidate().await;
        Ok(())
    }
}
