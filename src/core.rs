//! Core Medistore functionality
//!
//! This module contains the main Medistore struct and its implementation,
//! providing the database pool, the shared cache, and the per-entity stores.

use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::StoreError;
use crate::models::{
    Appointment, Department, Doctor, MedicalInventory, Patient, PatientFeedback, Prescription,
};
use crate::store::{EntityStore, Record};
use cache_system::{CacheManager, CacheParams, CacheStats};
use config::{AppConfig, DatabaseConfig};

/// Main Medistore coordinator that owns the connection pool and the cache
/// shared by every entity store
pub struct Medistore {
    pool: MySqlPool,
    cache: Arc<CacheManager>,
}

impl Medistore {
    /// Connect to the database and set up the shared cache
    pub async fn connect(config: AppConfig) -> Result<Self, StoreError> {
        let pool = pool_options(&config.database)
            .connect_with(connect_options(&config.database)?)
            .await
            .map_err(|e| StoreError::Connectivity(e.to_string()))?;

        tracing::debug!("[CORE] connected to {}", config.database.url);

        Ok(Self {
            pool,
            cache: Arc::new(CacheManager::new(config.cache)),
        })
    }

    /// Set up without touching the database; connections are opened on
    /// first use and failures surface from the operation that needed them
    pub fn connect_lazy(config: AppConfig) -> Result<Self, StoreError> {
        let pool =
            pool_options(&config.database).connect_lazy_with(connect_options(&config.database)?);

        Ok(Self {
            pool,
            cache: Arc::new(CacheManager::new(config.cache)),
        })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn store<T: Record>(&self) -> EntityStore<T> {
        let params = CacheParams::shared(Arc::clone(&self.cache));
        EntityStore::new(self.pool.clone(), Some(params))
    }

    pub fn doctors(&self) -> EntityStore<Doctor> {
        self.store()
    }

    pub fn patients(&self) -> EntityStore<Patient> {
        self.store()
    }

    pub fn departments(&self) -> EntityStore<Department> {
        self.store()
    }

    pub fn appointments(&self) -> EntityStore<Appointment> {
        self.store()
    }

    pub fn prescriptions(&self) -> EntityStore<Prescription> {
        self.store()
    }

    pub fn inventory(&self) -> EntityStore<MedicalInventory> {
        self.store()
    }

    pub fn feedback(&self) -> EntityStore<PatientFeedback> {
        self.store()
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Connectivity(e.to_string()))?;
        Ok(())
    }

    /// Snapshot of the shared cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Reset the shared cache counters
    pub fn reset_cache_stats(&self) {
        self.cache.reset_stats();
    }
}

fn connect_options(database: &DatabaseConfig) -> Result<MySqlConnectOptions, StoreError> {
    let mut options = MySqlConnectOptions::from_str(&database.url)
        .map_err(|e| StoreError::Connectivity(format!("invalid database url: {}", e)))?
        .username(&database.user);

    if !database.password.is_empty() {
        options = options.password(&database.password);
    }

    Ok(options)
}

fn pool_options(database: &DatabaseConfig) -> MySqlPoolOptions {
    let mut options = MySqlPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds));

    if database.idle_timeout_seconds > 0 {
        options = options.idle_timeout(Duration::from_secs(database.idle_timeout_seconds));
    }

    // Set max lifetime if specified
    if database.max_lifetime_seconds > 0 {
        options = options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
    }

    options
}
