//! Error types for the Medistore crate
//!
//! This module defines the error taxonomy every store operation reports:
//! validation failures, constraint violations, missing rows, connectivity
//! problems, and a catch-all for everything else.

use cache_system::CacheError;
use thiserror::Error;

/// Which database constraint a write violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{} constraint violated on {table}: {message}", .kind.as_str())]
    Constraint {
        table: &'static str,
        kind: ConstraintKind,
        message: String,
    },

    #[error("No row in {table} with id {id}")]
    NotFound { table: &'static str, id: i64 },

    #[error("Database connection error: {0}")]
    Connectivity(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CacheError> for StoreError {
    fn from(error: CacheError) -> Self {
        StoreError::Internal(error.to_string())
    }
}

/// Map a raw sqlx error onto the taxonomy.
///
/// The raw error is logged before it is reduced to a category, so the
/// driver-level detail is never lost to diagnosis.
pub(crate) fn classify(table: &'static str, error: sqlx::Error) -> StoreError {
    tracing::warn!("[{}] database error: {}", table, error);

    match &error {
        sqlx::Error::Database(db) => {
            if db.is_unique_violation() {
                StoreError::Constraint {
                    table,
                    kind: ConstraintKind::Unique,
                    message: db.message().to_string(),
                }
            } else if db.is_foreign_key_violation() {
                StoreError::Constraint {
                    table,
                    kind: ConstraintKind::ForeignKey,
                    message: db.message().to_string(),
                }
            } else {
                StoreError::Internal(db.message().to_string())
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Connectivity(error.to_string()),
        _ => StoreError::Internal(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_failure() {
        let err = StoreError::Validation("First name must not be blank".to_string());
        assert_eq!(err.to_string(), "Validation failed: First name must not be blank");

        let err = StoreError::NotFound {
            table: "doctors",
            id: 42,
        };
        assert_eq!(err.to_string(), "No row in doctors with id 42");

        let err = StoreError::Constraint {
            table: "appointments",
            kind: ConstraintKind::Unique,
            message: "Duplicate entry".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unique constraint violated on appointments: Duplicate entry"
        );
    }

    #[test]
    fn pool_errors_classify_as_connectivity() {
        let err = classify("doctors", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Connectivity(_)));
    }

    #[test]
    fn unrecognized_errors_classify_as_internal() {
        let err = classify("doctors", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[test]
    fn cache_errors_become_internal() {
        let bad = serde_json::from_str::<i64>("not json").unwrap_err();
        let err = StoreError::from(CacheError::from(bad));
        assert!(matches!(err, StoreError::Internal(_)));
    }
}
