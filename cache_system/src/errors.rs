//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! while reading or writing cached payloads.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
