use crate::{Address, BlockHash, BlockNumber, Bloom, H64, H256, U256};

/// Slimmed down version of [`Header`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Head {
    /// Block hash
    pub hash: BlockHash,
    /// Block number
    pub number: BlockNumber,
    /// Parent hash
    pub parent_hash: BlockHash,
    /// Timestamp
    pub timestamp: u64,
}

/// Block header
///
/// Every field except `base_fee_per_gas` is mandatory. A missing base fee means
/// the header predates the fork that introduced it; it is never read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    /// Hash of the block, the header's identity
    pub hash: BlockHash,
    /// Hash of the parent. Not required to be stored.
    pub parent_hash: BlockHash,
    /// Hash of the uncles
    pub uncles_hash: H256,
    /// Miner/author's address
    pub author: Address,
    /// State root hash
    pub state_root: H256,
    /// Transactions root hash
    pub transactions_root: H256,
    /// Transactions receipts root hash
    pub receipts_root: H256,
    /// Block number
    pub number: BlockNumber,
    /// Gas used
    pub gas_used: u64,
    /// Gas limit
    pub gas_limit: u64,
    /// Extra data, opaque and variable length
    pub extra_data: Vec<u8>,
    /// Logs bloom
    pub logs_bloom: Bloom,
    /// Timestamp, seconds since the epoch
    pub timestamp: u64,
    /// Difficulty
    pub difficulty: U256,
    /// Size in bytes
    pub size: u64,
    /// Mix hash
    pub mix_hash: H256,
    /// Nonce
    pub nonce: H64,
    /// Base fee per unit of gas (if past London)
    pub base_fee_per_gas: Option<u64>,
}

impl From<&Header> for Head {
    fn from(header: &Header) -> Self {
        Self {
            hash: header.hash,
            number: header.number,
            parent_hash: header.parent_hash,
            timestamp: header.timestamp,
        }
    }
}
