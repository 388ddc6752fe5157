//! Convenience re-exports for common Medistore usage
//!
//! This prelude re-exports the most commonly used items from the Medistore
//! ecosystem, making it easier to import everything you need with a single
//! use statement.
//!
//! # Example
//!
//! ```rust
//! use medistore::prelude::*;
//!
//! // Now you have access to all the common Medistore types and traits
//! ```

// Core Medistore components
pub use crate::controller::{EntityController, PageView, Status, StatusKind};
pub use crate::core::Medistore;
pub use crate::errors::{ConstraintKind, StoreError};

// Entity models and their sort keys
pub use crate::models::*;

// Store and query building blocks
pub use crate::pager::{DEFAULT_PAGE_SIZE, PageRequest, clamp_page_index, page_count};
pub use crate::query::{SearchTerm, SortKey, SortOrder};
pub use crate::store::{EntityStore, Persist, Record, SearchStore};
pub use crate::validate::{Validate, Validation};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, ConfigError, DatabaseConfig};

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{FromRow, MySqlPool, Row, Transaction};
