//! Store error types.

use std::sync::PoisonError;

use header_primitives::{BlockHash, InvalidHeaderError};
use thiserror::Error;

/// Errors surfaced by every [`HeaderStore`](crate::store::HeaderStore) backend.
///
/// Stores never retry internally; `StorageUnavailable` is the only kind a caller
/// may reasonably retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A header with this hash is already stored.
    #[error("header {0:#x} already stored")]
    DuplicateKey(BlockHash),

    /// No header with this hash is stored.
    #[error("header {0:#x} not found")]
    NotFound(BlockHash),

    /// A mandatory field is missing or malformed, either on the way in or in a
    /// stored row.
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[from] InvalidHeaderError),

    /// The underlying medium could not be read or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    /// Whether retrying the same call later may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<sled::Error> for StoreError {
    fn from(e: sled::Error) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        Self::StorageUnavailable("lock poisoned by a panicked writer".to_string())
    }
}
