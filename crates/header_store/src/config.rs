use std::path::PathBuf;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use header_primitives::{BlockHash, BlockNumber, InvalidHeaderError, parse};

use crate::store::Backend;
use crate::sync::SyncOptions;

#[derive(Parser, Debug)]
#[command(name = "header-store")]
#[command(about = "Block header store keyed by hash", long_about = None)]
pub struct Args {
    /// Storage engine
    #[arg(long, value_enum, env = "HEADERS_BACKEND", default_value = "sled")]
    pub backend: Backend,

    /// Database directory (sled) or log file (file)
    #[arg(long, env = "HEADERS_DB", default_value = "./data/headers")]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Follow a node over JSON-RPC and store every header
    Sync(SyncArgs),
    /// Print the header with the given hash
    Get {
        #[arg(value_parser = parse_block_hash)]
        hash: BlockHash,
    },
    /// Print every header at a height, forks included
    Height {
        number: BlockNumber,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the highest stored header
    Head,
}

#[derive(ClapArgs, Debug)]
pub struct SyncArgs {
    /// JSON-RPC endpoint of an execution node
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// First height to fetch when the store is empty
    #[arg(long, env = "START_HEIGHT", default_value_t = 0)]
    pub start_height: BlockNumber,

    /// Stop after this height instead of following the chain
    #[arg(long)]
    pub end_height: Option<BlockNumber>,

    /// Seconds between polls once caught up with the node
    #[arg(long, default_value_t = 12)]
    pub poll_interval: u64,

    /// Retries for a transient RPC or storage failure
    #[arg(long, default_value_t = 5)]
    pub max_retries: usize,
}

impl SyncArgs {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            start_height: self.start_height,
            end_height: self.end_height,
            poll_interval: Duration::from_secs(self.poll_interval),
            max_retries: self.max_retries,
        }
    }
}

fn parse_block_hash(s: &str) -> Result<BlockHash, InvalidHeaderError> {
    parse::h256("hash", s)
}
