//! Persisted layout of a header.
//!
//! One row per header, `hash` the sole key. Identifiers are lowercase
//! `0x`-prefixed hex text of fixed width, `difficulty` is decimal text, the two
//! byte fields are kept as raw bytes, and everything else is an exact integer.
//! `base_fee_per_gas` is the only nullable column.

use header_primitives::{Header, InvalidHeaderError, parse};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    pub hash: String,
    pub parent_hash: String,
    pub uncles_hash: String,
    pub author: String,
    pub state_root: String,
    pub transactions_root: String,
    pub receipts_root: String,
    pub number: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub extra_data: Vec<u8>,
    pub logs_bloom: Vec<u8>,
    pub timestamp: u64,
    pub difficulty: String,
    pub size: u64,
    pub mix_hash: String,
    pub nonce: String,
    #[serde(default)]
    pub base_fee_per_gas: Option<u64>,
}

impl HeaderRow {
    pub fn encode(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(self).map_err(|e| StoreError::StorageUnavailable(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| {
            StoreError::ConstraintViolation(InvalidHeaderError::Malformed {
                field: "row",
                reason: e.to_string(),
            })
        })
    }
}

impl From<&Header> for HeaderRow {
    fn from(header: &Header) -> Self {
        Self {
            hash: parse::to_hex(&header.hash),
            parent_hash: parse::to_hex(&header.parent_hash),
            uncles_hash: parse::to_hex(&header.uncles_hash),
            author: parse::to_hex(&header.author),
            state_root: parse::to_hex(&header.state_root),
            transactions_root: parse::to_hex(&header.transactions_root),
            receipts_root: parse::to_hex(&header.receipts_root),
            number: header.number,
            gas_used: header.gas_used,
            gas_limit: header.gas_limit,
            extra_data: header.extra_data.clone(),
            logs_bloom: header.logs_bloom.as_bytes().to_vec(),
            timestamp: header.timestamp,
            difficulty: header.difficulty.to_string(),
            size: header.size,
            mix_hash: parse::to_hex(&header.mix_hash),
            nonce: parse::to_hex(&header.nonce),
            base_fee_per_gas: header.base_fee_per_gas,
        }
    }
}

impl TryFrom<&HeaderRow> for Header {
    type Error = InvalidHeaderError;

    fn try_from(row: &HeaderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            hash: parse::h256("hash", &row.hash)?,
            parent_hash: parse::h256("parent_hash", &row.parent_hash)?,
            uncles_hash: parse::h256("uncles_hash", &row.uncles_hash)?,
            author: parse::address("author", &row.author)?,
            state_root: parse::h256("state_root", &row.state_root)?,
            transactions_root: parse::h256("transactions_root", &row.transactions_root)?,
            receipts_root: parse::h256("receipts_root", &row.receipts_root)?,
            number: row.number,
            gas_used: row.gas_used,
            gas_limit: row.gas_limit,
            extra_data: row.extra_data.clone(),
            logs_bloom: parse::fixed::<256>("logs_bloom", &row.logs_bloom)?.into(),
            timestamp: row.timestamp,
            difficulty: parse::decimal("difficulty", &row.difficulty)?,
            size: row.size,
            mix_hash: parse::h256("mix_hash", &row.mix_hash)?,
            nonce: parse::h64("nonce", &row.nonce)?,
            base_fee_per_gas: row.base_fee_per_gas,
        })
    }
}
