//! # Medistore
//!
//! Async data-access layer for a hospital management system: validated
//! writes, paginated and sortable search, and in-process result caching
//! over MySQL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medistore::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let medistore = Medistore::connect(config).await?;
//!
//!     let mut doctors = EntityController::new(medistore.doctors(), "doctor");
//!     doctors.search("smith").await;
//!     for doctor in &doctors.view().rows {
//!         println!("{} {} <{}>", doctor.first_name, doctor.last_name, doctor.email);
//!     }
//!
//!     let form = Doctor {
//!         doctor_id: None,
//!         first_name: "Grace".to_string(),
//!         last_name: "Hopper".to_string(),
//!         email: "grace.hopper@hospital.test".to_string(),
//!         phone: "555-7001".to_string(),
//!         department_id: Some(1),
//!     };
//!     if doctors.submit(&form).await {
//!         println!("{}", doctors.status().text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod core;
pub mod errors;
pub mod models;
pub mod pager;
pub mod prelude;
pub mod query;
pub mod store;
pub mod validate;

// Re-export the main public types for convenience
pub use crate::controller::{EntityController, PageView, Status, StatusKind};
pub use crate::core::Medistore;
pub use crate::errors::{ConstraintKind, StoreError};
pub use crate::store::{EntityStore, Persist, Record, SearchStore};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, ConfigError, DatabaseConfig};

// Re-export internal crates used in the public API
pub use cache_system;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
