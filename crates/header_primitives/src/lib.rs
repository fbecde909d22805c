//! Block header primitives shared by the header store and its ingestion loop.
//!
//! This crate exposes:
//! - `Header`: one block header, identified by its hash
//! - `Head`: the slimmed-down summary used to resume ingestion
//! - `RawHeader`: the loosely typed ingestion shape, as returned by `eth_getBlockBy*`
//! - `parse`: strict decoding of identifiers, quantities and byte fields
mod hash;
mod header;
pub mod parse;
mod raw;

pub use ethbloom::Bloom;
pub use hash::H64;
pub use header::{Head, Header};
pub use primitive_types::{H160, H256, U256};
pub use raw::{InvalidHeaderError, RawHeader};

/// A block hash
pub type BlockHash = H256;

/// A block number
pub type BlockNumber = u64;

/// An account address
pub type Address = H160;
