//! sled-backed header store.
//!
//! Two trees:
//! - `headers`: hash bytes -> [`HeaderRow`] JSON
//! - `headers_by_height`: `number_be || seq_be` -> hash bytes
//!
//! `seq` is taken from [`sled::Db::generate_id`], so a prefix scan over one
//! height yields headers in commit order and the last key of the index is the
//! head. Both trees are written in one transaction, flushed to disk before
//! `put` returns.
use std::path::Path;

use header_primitives::{BlockHash, BlockNumber, H256, Head, Header, InvalidHeaderError};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, IVec, Transactional, Tree};
use tracing::{debug, warn};

use super::HeaderStore;
use super::row::HeaderRow;
use crate::error::StoreError;

const HEADERS_TREE: &str = "headers";
const BY_HEIGHT_TREE: &str = "headers_by_height";

fn height_key(number: BlockNumber, seq: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&number.to_be_bytes());
    key[8..].copy_from_slice(&seq.to_be_bytes());
    key
}

fn hash_from_value(value: &IVec) -> Result<BlockHash, StoreError> {
    if value.len() != 32 {
        return Err(InvalidHeaderError::Malformed {
            field: "hash",
            reason: format!("height index holds {} bytes", value.len()),
        }
        .into());
    }
    Ok(H256::from_slice(value))
}

#[derive(Clone, Debug)]
pub struct SledStore {
    db: Db,
    headers: Tree,
    by_height: Tree,
}

impl SledStore {
    /// Opens (or creates) a database directory at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StoreError> {
        let headers = db.open_tree(HEADERS_TREE)?;
        let by_height = db.open_tree(BY_HEIGHT_TREE)?;
        Ok(Self {
            db,
            headers,
            by_height,
        })
    }

    fn load(&self, hash: &BlockHash) -> Result<Option<Header>, StoreError> {
        match self.headers.get(hash.as_bytes())? {
            Some(bytes) => {
                let row = HeaderRow::decode(&bytes)?;
                Ok(Some(Header::try_from(&row)?))
            }
            None => Ok(None),
        }
    }
}

impl HeaderStore for SledStore {
    fn put(&self, header: &Header) -> Result<(), StoreError> {
        let key = header.hash.as_bytes();
        let row = HeaderRow::from(header).encode()?;
        let index_key = height_key(header.number, self.db.generate_id()?);

        let result = (&self.headers, &self.by_height).transaction(|(headers, by_height)| {
            if headers.get(key)?.is_some() {
                return Err(ConflictableTransactionError::Abort(()));
            }
            headers.insert(key, row.as_slice())?;
            by_height.insert(&index_key[..], key)?;
            Ok(())
        });

        match result {
            Ok(()) => {}
            Err(TransactionError::Abort(())) => return Err(StoreError::DuplicateKey(header.hash)),
            Err(TransactionError::Storage(e)) => return Err(e.into()),
        }
        // Only report success once the header survives a crash.
        self.db.flush()?;
        debug!(hash = ?header.hash, number = header.number, "committed header");
        Ok(())
    }

    fn get_by_hash(&self, hash: &BlockHash) -> Result<Header, StoreError> {
        self.load(hash)?.ok_or(StoreError::NotFound(*hash))
    }

    fn list_by_height(
        &self,
        number: BlockNumber,
        limit: Option<usize>,
    ) -> Result<Vec<Header>, StoreError> {
        let mut headers = Vec::new();
        for entry in self
            .by_height
            .scan_prefix(number.to_be_bytes())
            .take(limit.unwrap_or(usize::MAX))
        {
            let (_, value) = entry?;
            let hash = hash_from_value(&value)?;
            match self.load(&hash)? {
                Some(header) => headers.push(header),
                None => warn!(?hash, number, "height index points at a missing header"),
            }
        }
        Ok(headers)
    }

    fn exists(&self, hash: &BlockHash) -> Result<bool, StoreError> {
        Ok(self.headers.contains_key(hash.as_bytes())?)
    }

    fn head(&self) -> Result<Option<Head>, StoreError> {
        let Some((_, value)) = self.by_height.last()? else {
            return Ok(None);
        };
        let hash = hash_from_value(&value)?;
        Ok(self.load(&hash)?.as_ref().map(Head::from))
    }
}
