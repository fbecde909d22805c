use header_primitives::{Address, Bloom, H64, H256, Header, U256};

fn hash_from_seed(seed: u64) -> H256 {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xaa;
    bytes[24..].copy_from_slice(&seed.to_be_bytes());
    H256::from(bytes)
}

/// A pre-London header whose hash is derived from `seed`.
pub(crate) fn sample_header(seed: u64, number: u64) -> Header {
    let mut bloom = [0u8; 256];
    bloom[255] = 0x80;
    Header {
        hash: hash_from_seed(seed),
        parent_hash: hash_from_seed(seed.wrapping_sub(1)),
        uncles_hash: H256::repeat_byte(0x1d),
        author: Address::repeat_byte(0x05),
        state_root: H256::repeat_byte(0xd6),
        transactions_root: H256::repeat_byte(0x56),
        receipts_root: H256::repeat_byte(0x56),
        number,
        gas_used: 21_000,
        gas_limit: 30_000_000,
        extra_data: b"\0Geth/v1.0.0/linux/go1.4.2\0".to_vec(),
        logs_bloom: Bloom::from(bloom),
        timestamp: 1_438_269_988 + number,
        difficulty: U256::MAX - U256::from(seed),
        size: 537,
        mix_hash: H256::repeat_byte(0x96),
        nonce: H64::from([0, 0, 0, 0, 0x9f, 0xef, 0x1e, 0xc4]),
        base_fee_per_gas: None,
    }
}
