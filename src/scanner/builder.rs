use std::{collections::HashSet, path::PathBuf, time::Duration};

use alloy::primitives::Address;

use crate::{
    chain_client::ChainClient,
    error::ScannerError,
    scanner::{
        checkpoint::CheckpointStore,
        coordinator::DebtScanner,
        extractor::DebtorExtractor,
        fetcher::{BorrowFetcher, FetchPolicy},
        guard::StateGuard,
        planner::WindowPlanner,
        state::ScannerState,
    },
    types::ScannerResult,
};

/// Default scan window width, in blocks.
pub const DEFAULT_CHUNK_SIZE: u64 = 100;
/// Default per-request sub-range width, in blocks.
pub const DEFAULT_SUB_CHUNK_SIZE: u64 = 10;
/// Default number of blocks of head progress between backfill windows.
pub const DEFAULT_SCAN_INTERVAL: u64 = 5;
/// Default timeout for acquiring the state guard.
pub const DEFAULT_GUARD_TIMEOUT: Duration = Duration::from_millis(500);
/// Default cap on forward windows scanned in a single tick.
pub const DEFAULT_MAX_WINDOWS_PER_TICK: usize = 4;

/// Builder for [`DebtScanner`].
///
/// # Examples
///
/// ```no_run
/// use debt_scanner::{ChainClientBuilder, DebtScannerBuilder};
/// use alloy::primitives::address;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ChainClientBuilder::connect("https://mainnet.base.org").await?.build();
///
/// let scanner = DebtScannerBuilder::new(address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"))
///     .instrument(address!("4200000000000000000000000000000000000006"))
///     .chunk_size(200)
///     .checkpoint_path("debt-scanner.json")
///     .connect(client)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DebtScannerBuilder {
    pool: Address,
    instruments: HashSet<Address>,
    chunk_size: u64,
    sub_chunk_size: u64,
    scan_interval: u64,
    guard_timeout: Duration,
    max_windows_per_tick: usize,
    fetch_policy: FetchPolicy,
    checkpoint_path: Option<PathBuf>,
}

impl DebtScannerBuilder {
    /// Start configuring a scanner for one lending pool contract.
    #[must_use]
    pub fn new(pool: Address) -> Self {
        Self {
            pool,
            instruments: HashSet::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            sub_chunk_size: DEFAULT_SUB_CHUNK_SIZE,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            guard_timeout: DEFAULT_GUARD_TIMEOUT,
            max_windows_per_tick: DEFAULT_MAX_WINDOWS_PER_TICK,
            fetch_policy: FetchPolicy::default(),
            checkpoint_path: None,
        }
    }

    /// Track one instrument (reserve asset) address. Can be called
    /// repeatedly.
    #[must_use]
    pub fn instrument(mut self, instrument: Address) -> Self {
        self.instruments.insert(instrument);
        self
    }

    /// Track every instrument in the iterator.
    #[must_use]
    pub fn instruments<I: IntoIterator<Item = Address>>(mut self, instruments: I) -> Self {
        self.instruments.extend(instruments);
        self
    }

    /// Width of each scheduled scan window, in blocks.
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Width of each log request inside a window, in blocks. Must not
    /// exceed the chunk size.
    #[must_use]
    pub fn sub_chunk_size(mut self, sub_chunk_size: u64) -> Self {
        self.sub_chunk_size = sub_chunk_size;
        self
    }

    /// Head progress, in blocks, required between backfill windows.
    #[must_use]
    pub fn scan_interval(mut self, scan_interval: u64) -> Self {
        self.scan_interval = scan_interval;
        self
    }

    /// How long tick and live-event handling may wait on the state guard
    /// before reporting contention.
    #[must_use]
    pub fn guard_timeout(mut self, guard_timeout: Duration) -> Self {
        self.guard_timeout = guard_timeout;
        self
    }

    /// Cap on forward catch-up windows scanned per tick.
    #[must_use]
    pub fn max_windows_per_tick(mut self, max_windows_per_tick: usize) -> Self {
        self.max_windows_per_tick = max_windows_per_tick;
        self
    }

    /// What to do with a window whose log fetches partially failed; see
    /// [`FetchPolicy`].
    #[must_use]
    pub fn fetch_policy(mut self, fetch_policy: FetchPolicy) -> Self {
        self.fetch_policy = fetch_policy;
        self
    }

    /// Persist state to this JSON file and resume from it on startup.
    #[must_use]
    pub fn checkpoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    /// Validate the configuration, reconcile any persisted checkpoint with
    /// the current chain head and assemble the scanner.
    ///
    /// A missing or unreadable checkpoint file is not fatal: scanning
    /// starts fresh from the head instead.
    ///
    /// # Errors
    ///
    /// * [`ScannerError::NoInstruments`] if no instrument was configured.
    /// * [`ScannerError::InvalidChunkSize`] if the chunk size is zero.
    /// * [`ScannerError::InvalidSubChunkSize`] if the sub-chunk size is
    ///   zero or larger than the chunk size.
    /// * [`ScannerError::InvalidWindowsPerTick`] if the per-tick window
    ///   cap is zero.
    /// * [`ScannerError::RpcError`] or [`ScannerError::Timeout`] if the
    ///   initial head query fails.
    pub async fn connect(self, client: ChainClient) -> ScannerResult<DebtScanner> {
        if self.instruments.is_empty() {
            return Err(ScannerError::NoInstruments);
        }
        if self.chunk_size == 0 {
            return Err(ScannerError::InvalidChunkSize);
        }
        if self.sub_chunk_size == 0 || self.sub_chunk_size > self.chunk_size {
            return Err(ScannerError::InvalidSubChunkSize);
        }
        if self.max_windows_per_tick == 0 {
            return Err(ScannerError::InvalidWindowsPerTick);
        }

        let head = client.head_number().await?;

        let store = self.checkpoint_path.map(CheckpointStore::new);
        let state = match &store {
            Some(store) => match store.load().await {
                Some(checkpoint) => ScannerState::restore(checkpoint, head),
                None => ScannerState::fresh(head),
            },
            None => ScannerState::fresh(head),
        };
        info!(
            head = head,
            pool = %self.pool,
            instruments = self.instruments.len(),
            forward_frontier = state.frontiers.forward,
            seen = state.dedup.seen_len(),
            "debt scanner ready"
        );

        Ok(DebtScanner::new(
            BorrowFetcher::new(client, self.pool, self.sub_chunk_size),
            DebtorExtractor::new(self.instruments),
            WindowPlanner::new(self.chunk_size, self.scan_interval),
            StateGuard::new(state, self.guard_timeout),
            store,
            self.fetch_policy,
            self.max_windows_per_tick,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_client::ChainClientBuilder;
    use alloy::{
        network::Ethereum,
        providers::{RootProvider, mock::Asserter},
        rpc::client::RpcClient,
    };

    const POOL: Address = Address::repeat_byte(0xf0);
    const RESERVE: Address = Address::repeat_byte(0x11);

    fn mocked_client(asserter: &Asserter) -> ChainClient {
        let provider = RootProvider::<Ethereum>::new(RpcClient::mocked(asserter.clone()));
        ChainClientBuilder::fragile(provider).build()
    }

    #[test]
    fn defaults_match_documented_constants() {
        let builder = DebtScannerBuilder::new(POOL);

        assert_eq!(builder.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(builder.sub_chunk_size, DEFAULT_SUB_CHUNK_SIZE);
        assert_eq!(builder.scan_interval, DEFAULT_SCAN_INTERVAL);
        assert_eq!(builder.guard_timeout, DEFAULT_GUARD_TIMEOUT);
        assert_eq!(builder.max_windows_per_tick, DEFAULT_MAX_WINDOWS_PER_TICK);
        assert_eq!(builder.fetch_policy, FetchPolicy::FailOpen);
        assert!(builder.instruments.is_empty());
        assert!(builder.checkpoint_path.is_none());
    }

    #[tokio::test]
    async fn rejects_empty_instrument_set() {
        let asserter = Asserter::new();
        let result = DebtScannerBuilder::new(POOL).connect(mocked_client(&asserter)).await;

        assert!(matches!(result, Err(ScannerError::NoInstruments)));
    }

    #[tokio::test]
    async fn rejects_zero_chunk_size() {
        let asserter = Asserter::new();
        let result = DebtScannerBuilder::new(POOL)
            .instrument(RESERVE)
            .chunk_size(0)
            .connect(mocked_client(&asserter))
            .await;

        assert!(matches!(result, Err(ScannerError::InvalidChunkSize)));
    }

    #[tokio::test]
    async fn rejects_sub_chunk_wider_than_chunk() {
        let asserter = Asserter::new();
        let result = DebtScannerBuilder::new(POOL)
            .instrument(RESERVE)
            .chunk_size(10)
            .sub_chunk_size(20)
            .connect(mocked_client(&asserter))
            .await;

        assert!(matches!(result, Err(ScannerError::InvalidSubChunkSize)));
    }

    #[tokio::test]
    async fn rejects_zero_window_cap() {
        let asserter = Asserter::new();
        let result = DebtScannerBuilder::new(POOL)
            .instrument(RESERVE)
            .max_windows_per_tick(0)
            .connect(mocked_client(&asserter))
            .await;

        assert!(matches!(result, Err(ScannerError::InvalidWindowsPerTick)));
    }

    #[tokio::test]
    async fn seeds_fresh_state_from_head() {
        let asserter = Asserter::new();
        asserter.push_success(&"0xfa");

        let scanner = DebtScannerBuilder::new(POOL)
            .instrument(RESERVE)
            .connect(mocked_client(&asserter))
            .await
            .unwrap();

        let summary = scanner.summary().await;
        assert_eq!(summary.forward_frontier, 250);
        assert_eq!(summary.backfill_frontier, Some(250));
        assert_eq!(summary.last_backfill_tick, 0);
        assert_eq!(summary.seen_len, 0);
        assert_eq!(summary.backlog_len, 0);
    }

    #[tokio::test]
    async fn surfaces_head_query_failure() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("nope");

        let result = DebtScannerBuilder::new(POOL)
            .instrument(RESERVE)
            .connect(mocked_client(&asserter))
            .await;

        assert!(matches!(result, Err(ScannerError::RpcError(_))));
    }
}
