//! Durable storage of block headers keyed by hash.
//!
//! A header moves from absent to present exactly once and is never updated in
//! place. Every backend gives the same guarantees:
//! - a `put` is visible to readers in full or not at all;
//! - of several racing `put`s for one hash exactly one wins, the others fail
//!   with `DuplicateKey`;
//! - headers sharing a height are listed in commit order, oldest first.
//!
//! `parent_hash` is deliberately not checked against stored headers, since
//! headers may arrive out of order or from forks that are not fully loaded.
use std::path::Path;

use clap::ValueEnum;
use header_primitives::{BlockHash, BlockNumber, Head, Header, RawHeader};

use crate::error::StoreError;

pub mod file;
mod index;
pub mod memory;
pub mod row;
pub mod sled_store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use row::HeaderRow;
pub use sled_store::SledStore;

pub trait HeaderStore: Send + Sync {
    /// Inserts a header. Fails with `DuplicateKey` if the hash is already
    /// stored, whatever the stored content, leaving the store unchanged.
    fn put(&self, header: &Header) -> Result<(), StoreError>;

    /// Validates an ingestion-shaped header and inserts it.
    fn put_raw(&self, raw: &RawHeader) -> Result<Header, StoreError> {
        let header = Header::try_from(raw)?;
        self.put(&header)?;
        Ok(header)
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Header, StoreError>;

    /// All headers at `number`, oldest commit first, truncated to `limit`.
    fn list_by_height(
        &self,
        number: BlockNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Header>, StoreError>;

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError>;

    /// The highest stored header; among forks at that height, the latest commit.
    fn head(&self) -> Result<Option<Head>, StoreError>;
}

impl<S: HeaderStore + ?Sized> HeaderStore for Box<S> {
    fn put(&self, header: &Header) -> Result<(), StoreError> {
        (**self).put(header)
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Header, StoreError> {
        (**self).get_by_hash(hash)
    }

    fn list_by_height(
        &self,
        number: BlockNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Header>, StoreError> {
        (**self).list_by_height(number, limit)
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        (**self).exists(hash)
    }

    fn head(&self) -> Result<Option<Head>, StoreError> {
        (**self).head()
    }
}

/// Storage engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// sled database directory
    Sled,
    /// append-only JSONL file
    File,
    /// process memory, nothing persisted
    Memory,
}

/// Opens the selected backend at `path`, creating it on first use.
pub fn open_store(backend: Backend, path: &Path) -> Result<Box<dyn HeaderStore>, StoreError> {
    Ok(match backend {
        Backend::Sled => Box::new(SledStore::open(path)?),
        Backend::File => Box::new(FileStore::new(path)?),
        Backend::Memory => Box::new(MemoryStore::new()),
    })
}
