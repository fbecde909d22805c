use std::collections::{BTreeMap, HashMap};

use header_primitives::{BlockHash, BlockNumber, Head, Header};

use crate::error::StoreError;

/// In-memory tables: headers by hash plus a height index kept in commit order.
///
/// Not synchronized; owners wrap it in a lock and hold the write guard across
/// the duplicate check and the insert.
#[derive(Debug, Default)]
pub(crate) struct Index {
    headers: HashMap<BlockHash, Header>,
    by_height: BTreeMap<BlockNumber, Vec<BlockHash>>,
}

impl Index {
    pub(crate) fn contains(&self, hash: &BlockHash) -> bool {
        self.headers.contains_key(hash)
    }

    pub(crate) fn insert(&mut self, header: Header) -> Result<(), StoreError> {
        if self.contains(&header.hash) {
            return Err(StoreError::DuplicateKey(header.hash));
        }
        self.by_height
            .entry(header.number)
            .or_default()
            .push(header.hash);
        self.headers.insert(header.hash, header);
        Ok(())
    }

    pub(crate) fn get(&self, hash: &BlockHash) -> Result<Header, StoreError> {
        self.headers
            .get(hash)
            .cloned()
            .ok_or(StoreError::NotFound(*hash))
    }

    pub(crate) fn at_height(&self, number: BlockNumber, limit: Option<usize>) -> Vec<Header> {
        let Some(hashes) = self.by_height.get(&number) else {
            return Vec::new();
        };
        hashes
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|hash| self.headers.get(hash).cloned())
            .collect()
    }

    pub(crate) fn head(&self) -> Option<Head> {
        let (_, hashes) = self.by_height.last_key_value()?;
        let hash = hashes.last()?;
        self.headers.get(hash).map(Head::from)
    }

    pub(crate) fn len(&self) -> usize {
        self.headers.len()
    }
}
