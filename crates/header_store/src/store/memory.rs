//! In-memory header store for tests and dry runs.

use std::sync::RwLock;

use header_primitives::{BlockHash, BlockNumber, Head, Header};
use tracing::trace;

use super::HeaderStore;
use super::index::Index;
use crate::error::StoreError;

/// Thread-safe, non-durable [`HeaderStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    index: RwLock<Index>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored headers.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.index.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl HeaderStore for MemoryStore {
    fn put(&self, header: &Header) -> Result<(), StoreError> {
        self.index.write()?.insert(header.clone())?;
        trace!(hash = ?header.hash, number = header.number, "stored header in memory");
        Ok(())
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Header, StoreError> {
        self.index.read()?.get(hash)
    }

    fn list_by_height(
        &self,
        number: BlockNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Header>, StoreError> {
        Ok(self.index.read()?.at_height(number, limit))
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        Ok(self.index.read()?.contains(hash))
    }

    fn head(&self) -> Result<Option<Head>, StoreError> {
        Ok(self.index.read()?.head())
    }
}
