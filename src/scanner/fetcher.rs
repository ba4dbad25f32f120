use alloy::{primitives::Address, rpc::types::Filter, sol, sol_types::SolEvent};

use crate::{
    chain_client::ChainClient,
    scanner::splitter::RangeSplitter,
    types::{LogRecord, ScanWindow},
};

sol! {
    /// Borrow event emitted by an Aave v3 style lending pool.
    #[derive(Debug)]
    event Borrow(
        address indexed reserve,
        address user,
        address indexed onBehalfOf,
        uint256 amount,
        uint8 interestRateMode,
        uint256 borrowRate,
        uint16 indexed referralCode
    );
}

/// How a window whose fetch lost sub-ranges is treated upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Failed sub-ranges are logged and counted, and the window still
    /// commits. Keeps the scan loop moving at the cost of permanently
    /// skipping whatever the failed sub-ranges held.
    #[default]
    FailOpen,
    /// A window with any failed sub-range does not commit its frontier, so
    /// the same window is retried on a later tick.
    Strict,
}

/// Result of fetching one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Decoded records, in ascending sub-range order.
    pub records: Vec<LogRecord>,
    /// Sub-ranges that failed and yielded no records.
    pub failed_ranges: usize,
}

impl FetchOutcome {
    /// True iff every sub-range was retrieved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_ranges == 0
    }
}

/// Decode a raw log into a [`LogRecord`].
///
/// Returns `None` for logs that are not a well-formed `Borrow` event or
/// that carry no block number.
#[must_use]
pub fn decode_borrow(log: &alloy::rpc::types::Log) -> Option<LogRecord> {
    let height = log.block_number?;
    let event = Borrow::decode_log_data(log.data()).ok()?;
    Some(LogRecord { height, instrument: event.reserve, borrower: event.onBehalfOf })
}

/// Chunked `Borrow` log retrieval against one pool contract.
///
/// A window is split into sub-ranges no larger than the provider's range
/// cap, and each sub-range is fetched independently: one failing
/// `eth_getLogs` call costs only that sub-range, never the window. Whether
/// the loss also blocks the frontier commit is the caller's
/// [`FetchPolicy`] decision.
#[derive(Debug, Clone)]
pub struct BorrowFetcher {
    client: ChainClient,
    pool: Address,
    sub_chunk_size: u64,
}

impl BorrowFetcher {
    #[must_use]
    pub fn new(client: ChainClient, pool: Address, sub_chunk_size: u64) -> Self {
        Self { client, pool, sub_chunk_size }
    }

    /// Fetch and decode all `Borrow` logs in `window`.
    pub async fn fetch(&self, window: ScanWindow) -> FetchOutcome {
        let mut records = Vec::new();
        let mut failed_ranges = 0;

        for sub in RangeSplitter::new(window.start, window.stop, self.sub_chunk_size) {
            let filter = Filter::new()
                .address(self.pool)
                .event_signature(Borrow::SIGNATURE_HASH)
                .from_block(sub.start)
                .to_block(sub.stop);

            match self.client.logs(&filter).await {
                Ok(logs) => {
                    for log in &logs {
                        match decode_borrow(log) {
                            Some(record) => records.push(record),
                            None => {
                                debug!(range = %sub, "skipping undecodable log");
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, range = %sub, "log fetch failed, skipping sub-range");
                    failed_ranges += 1;
                }
            }
        }

        FetchOutcome { records, failed_ranges }
    }
}
