//! Durable block header storage keyed by hash.
//!
//! - `store`: the `HeaderStore` contract and its memory, JSONL file and sled backends
//! - `net`: a minimal Ethereum JSON-RPC client
//! - `sync`: the ingestion loop feeding a store from a block source
//! - `config`: command line and environment configuration of the binary
pub mod config;
pub mod error;
pub mod net;
pub mod store;
pub mod sync;

pub use error::StoreError;
pub use store::{Backend, FileStore, HeaderStore, MemoryStore, SledStore, open_store};
