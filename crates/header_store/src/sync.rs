use std::future::{Future, ready};
use std::time::Duration;

use header_primitives::{BlockNumber, Header, InvalidHeaderError, RawHeader};
use thiserror::Error;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::net::rpc::{RpcClient, RpcError};
use crate::store::HeaderStore;

/// Errors that stop a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The source returned a block that cannot be stored as a header.
    #[error("block {number}: {source}")]
    InvalidBlock {
        number: BlockNumber,
        #[source]
        source: InvalidHeaderError,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Anything that can hand out blocks by number.
pub trait BlockSource {
    fn block_by_number(
        &self,
        number: BlockNumber,
    ) -> impl Future<Output = Result<Option<RawHeader>, RpcError>>;
}

impl BlockSource for RpcClient {
    async fn block_by_number(&self, number: BlockNumber) -> Result<Option<RawHeader>, RpcError> {
        self.get_block_by_number(number).await
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// First height to fetch when the store is empty.
    pub start_height: BlockNumber,
    /// Last height to fetch; `None` follows the chain forever.
    pub end_height: Option<BlockNumber>,
    /// Wait between polls once the source has no block at the next height.
    pub poll_interval: Duration,
    /// Attempts after the first for a transient RPC or storage failure.
    pub max_retries: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            start_height: 0,
            end_height: None,
            poll_interval: Duration::from_secs(12),
            max_retries: 5,
        }
    }
}

/// What a finished sync run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub stored: u64,
    pub skipped: u64,
    pub next_height: BlockNumber,
}

fn backoff(max_retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(max_retries)
}

/// Copies headers from `source` into `store`, one height at a time.
///
/// Resumes at `head + 1` when the store is not empty. A header whose hash is
/// already stored is skipped, including when another writer commits it between
/// the existence check and the insert; the store itself reports that case as
/// `DuplicateKey`. Transient failures are retried with exponential backoff.
pub async fn sync_headers<B, S>(
    source: &B,
    store: &S,
    opts: &SyncOptions,
) -> Result<SyncReport, SyncError>
where
    B: BlockSource,
    S: HeaderStore + ?Sized,
{
    let mut height = match store.head()? {
        Some(head) => match head.number.checked_add(1) {
            Some(h) => h,
            None => return Ok(SyncReport::default()),
        },
        None => opts.start_height,
    };
    let mut report = SyncReport {
        next_height: height,
        ..SyncReport::default()
    };
    info!(height, end = ?opts.end_height, "starting header sync");

    loop {
        if let Some(end) = opts.end_height
            && height > end
        {
            break;
        }

        let block = RetryIf::spawn(
            backoff(opts.max_retries),
            move || source.block_by_number(height),
            |e: &RpcError| e.is_transient(),
        )
        .await?;
        let Some(raw) = block else {
            debug!(height, "block not available yet");
            tokio::time::sleep(opts.poll_interval).await;
            continue;
        };

        let header = Header::try_from(&raw)
            .map_err(|source| SyncError::InvalidBlock { number: height, source })?;
        let header_ref = &header;

        let outcome = if store.exists(&header.hash)? {
            Err(StoreError::DuplicateKey(header.hash))
        } else {
            RetryIf::spawn(
                backoff(opts.max_retries),
                move || ready(store.put(header_ref)),
                |e: &StoreError| e.is_transient(),
            )
            .await
        };

        match outcome {
            Ok(()) => {
                report.stored += 1;
                info!(number = header.number, hash = ?header.hash, "stored header");
            }
            Err(StoreError::DuplicateKey(hash)) => {
                report.skipped += 1;
                debug!(number = header.number, ?hash, "header already stored");
            }
            Err(e) => return Err(e.into()),
        }

        height = match height.checked_add(1) {
            Some(next) => next,
            None => break,
        };
        report.next_height = height;
    }

    info!(
        stored = report.stored,
        skipped = report.skipped,
        next = report.next_height,
        "header sync finished"
    );
    Ok(report)
}
