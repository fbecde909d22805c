// ignore clippy warnings in `construct_fixed_hash!` macro.
#![allow(
    clippy::pedantic,
    clippy::reversed_empty_ranges,
    clippy::assign_op_pattern,
    clippy::non_canonical_clone_impl
)]
use fixed_hash::construct_fixed_hash;

construct_fixed_hash! {
    /// 64-bit proof-of-work nonce.
    pub struct H64(8);
}
