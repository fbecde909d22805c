#![allow(dead_code)]

use header_primitives::{Address, Bloom, H64, H256, Header, RawHeader, U256};

pub fn hash_from_seed(seed: u64) -> H256 {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xbb;
    bytes[24..].copy_from_slice(&seed.to_be_bytes());
    H256::from(bytes)
}

/// A header with hash derived from `seed`; `base_fee` selects pre or post London.
pub fn sample_header(seed: u64, number: u64, base_fee: Option<u64>) -> Header {
    Header {
        hash: hash_from_seed(seed),
        parent_hash: hash_from_seed(seed.wrapping_sub(1)),
        uncles_hash: H256::repeat_byte(0x1d),
        author: Address::repeat_byte(0xee),
        state_root: H256::repeat_byte(0x01),
        transactions_root: H256::repeat_byte(0x02),
        receipts_root: H256::repeat_byte(0x03),
        number,
        gas_used: 15_000_000,
        gas_limit: 30_000_000,
        extra_data: format!("seed-{seed}").into_bytes(),
        logs_bloom: Bloom::repeat_byte(0x10),
        timestamp: 1_700_000_000 + number * 12,
        difficulty: U256::from(seed) + U256::from(u64::MAX),
        size: 1_024,
        mix_hash: H256::repeat_byte(0x04),
        nonce: H64::from_low_u64_be(seed),
        base_fee_per_gas: base_fee,
    }
}

/// A linear chain of `len` headers starting at `first`, as the node would return them.
pub fn raw_chain(first: u64, len: u64) -> Vec<RawHeader> {
    (first..first + len)
        .map(|n| RawHeader::from(&sample_header(n, n, Some(7))))
        .collect()
}
