//! Typed errors for the handle directory.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can map
//! each kind to their own response (e.g. a 400 for validation failures).

use thiserror::Error;

use crate::types::{Platform, RecordId};

/// Errors surfaced by directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Submitted handle fails the platform's validation pattern
    #[error("invalid {platform} handle: {handle:?}")]
    InvalidHandleFormat { platform: Platform, handle: String },

    /// Query-surface input out of bounds (rejected before any store access)
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// Any failure reported by the store adapter
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    pub fn validation(reason: impl Into<String>) -> Self {
        DirectoryError::Validation {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the backend.
    pub fn is_client_error(&self) -> bool {
        match self {
            DirectoryError::InvalidHandleFormat { .. } | DirectoryError::Validation { .. } => true,
            DirectoryError::Store(e) => matches!(e, StoreError::NotFound { .. }),
        }
    }
}

/// Errors reported by a [`DirectoryStore`](crate::traits::store::DirectoryStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Insert collided with an existing (platform, handle) row
    #[error("record already exists for {platform} handle {handle:?}")]
    Conflict { platform: Platform, handle: String },

    /// No record with this id
    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    /// Stored data could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// Any other backend failure
    #[error("store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Backend(Box::new(other)),
        }
    }
}

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
