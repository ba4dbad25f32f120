use std::collections::BTreeSet;

use alloy::primitives::{Address, BlockNumber};

use crate::{
    error::ScannerError,
    scanner::{
        checkpoint::CheckpointStore,
        extractor::DebtorExtractor,
        fetcher::{BorrowFetcher, FetchPolicy},
        guard::StateGuard,
        planner::WindowPlanner,
        state::ScannerState,
    },
    types::{
        LiveOutcome, LogRecord, ScanDirection, ScanWindow, StateSummary, TickOutcome, TickReport,
        WindowReport,
    },
};

/// The debtor discovery engine.
///
/// Purely reactive: the embedding process delivers chain progress through
/// [`on_tick`](Self::on_tick) and already-decoded live events through
/// [`on_borrow`](Self::on_borrow); the scanner schedules nothing on its
/// own. Both entry points go through the same timeout-bounded state guard
/// and the same dedup policy, so they can race freely.
///
/// Per tick, forward catch-up windows run first (bounded per tick so a long
/// outage cannot monopolize one invocation), strictly in ascending order,
/// each committed only after its records are processed. One backfill window
/// follows, but only when forward scanning is caught up and enough head
/// progress has accumulated since backfill last ran.
#[derive(Debug)]
pub struct DebtScanner {
    fetcher: BorrowFetcher,
    extractor: DebtorExtractor,
    planner: WindowPlanner,
    guard: StateGuard<ScannerState>,
    checkpoint: Option<CheckpointStore>,
    fetch_policy: FetchPolicy,
    max_windows_per_tick: usize,
}

impl DebtScanner {
    pub(crate) fn new(
        fetcher: BorrowFetcher,
        extractor: DebtorExtractor,
        planner: WindowPlanner,
        guard: StateGuard<ScannerState>,
        checkpoint: Option<CheckpointStore>,
        fetch_policy: FetchPolicy,
        max_windows_per_tick: usize,
    ) -> Self {
        Self { fetcher, extractor, planner, guard, checkpoint, fetch_policy, max_windows_per_tick }
    }

    /// Handle a chain-tick notification carrying the current head height.
    ///
    /// Returns [`TickOutcome::Contended`] without touching any state when
    /// the guard cannot be acquired within its timeout; the next tick
    /// simply retries. Transient fetch trouble never surfaces as an error,
    /// it is folded into the returned report.
    pub async fn on_tick(&self, head: BlockNumber) -> TickOutcome {
        let Some(mut state) = self.guard.acquire().await else {
            debug!(head = head, "tick skipped, state guard contended");
            return TickOutcome::Contended;
        };

        let mut windows = Vec::new();
        let mut tick_found = BTreeSet::new();

        let mut forward_scanned = 0;
        while forward_scanned < self.max_windows_per_tick {
            let Some(window) = self.planner.next_forward(&state.frontiers, head) else {
                break;
            };
            let report = self
                .scan_window(&mut state, window, ScanDirection::Forward, head, &mut tick_found)
                .await;
            forward_scanned += 1;
            let committed = report.committed;
            windows.push(report);
            if !committed {
                // retried on a later tick, no point rescanning it now
                break;
            }
        }

        let caught_up = self.planner.next_forward(&state.frontiers, head).is_none();
        let backfill_window = if caught_up && self.planner.backfill_due(&state.frontiers, head) {
            self.planner.next_backfill(&mut state.frontiers, head)
        } else {
            None
        };
        if !caught_up {
            info!(
                head = head,
                forward_frontier = state.frontiers.forward,
                "catch-up in progress, backfill deferred"
            );
        }
        if let Some(window) = backfill_window {
            let report = self
                .scan_window(&mut state, window, ScanDirection::Backfill, head, &mut tick_found)
                .await;
            windows.push(report);
        }

        let enqueued = windows.iter().map(|window| window.enqueued).sum();
        let report = TickReport {
            head,
            found: tick_found.len(),
            enqueued,
            caught_up,
            forward_frontier: state.frontiers.forward,
            backfill_frontier: state.frontiers.backfill,
            backlog_len: state.dedup.backlog_len(),
            seen_len: state.dedup.seen_len(),
            windows,
        };
        debug!(
            head = head,
            windows = report.windows.len(),
            enqueued = report.enqueued,
            caught_up = report.caught_up,
            "tick complete"
        );
        TickOutcome::Scanned(report)
    }

    /// Ingest one live, already-decoded borrow record.
    ///
    /// Fast out-of-band path: the record's own height feeds the freshness
    /// check and no frontier moves, so the scheduled scan still covers the
    /// same range later and simply finds the address already seen.
    pub async fn on_borrow(&self, record: LogRecord) -> LiveOutcome {
        let Some(mut state) = self.guard.acquire().await else {
            debug!(height = record.height, "live event skipped, state guard contended");
            return LiveOutcome::Contended;
        };

        let Some(borrower) = self.extractor.extract(&record) else {
            return LiveOutcome::NotTracked;
        };

        if state.dedup.enqueue_if_newer(borrower, record.height) {
            info!(
                borrower = %borrower,
                height = record.height,
                backlog_total = state.dedup.backlog_len(),
                "live borrow enqueued"
            );
            LiveOutcome::Enqueued
        } else {
            LiveOutcome::Stale
        }
    }

    /// Remove and return all pending backlog entries for downstream
    /// handling. Waits for the guard.
    pub async fn drain_backlog(&self) -> BTreeSet<Address> {
        self.guard.wait().await.dedup.drain_backlog()
    }

    /// Point-in-time state summary. Waits for the guard.
    pub async fn summary(&self) -> StateSummary {
        self.guard.wait().await.summary()
    }

    /// Persist the current state, if a checkpoint path is configured.
    ///
    /// The guard is held only while snapshotting, not during file I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::CheckpointIo`] or
    /// [`ScannerError::CheckpointEncode`] if writing fails; the in-memory
    /// state stays authoritative either way.
    pub async fn save_checkpoint(&self) -> Result<(), ScannerError> {
        let Some(store) = &self.checkpoint else {
            debug!("no checkpoint path configured, skipping save");
            return Ok(());
        };

        let snapshot = self.guard.wait().await.snapshot();
        store.save(&snapshot).await
    }

    async fn scan_window(
        &self,
        state: &mut ScannerState,
        window: ScanWindow,
        direction: ScanDirection,
        head: BlockNumber,
        tick_found: &mut BTreeSet<Address>,
    ) -> WindowReport {
        let outcome = self.fetcher.fetch(window).await;

        let mut window_found = BTreeSet::new();
        let mut enqueued = 0;
        for record in &outcome.records {
            if let Some(borrower) = self.extractor.extract(record) {
                window_found.insert(borrower);
                if state.dedup.enqueue_if_newer(borrower, record.height) {
                    enqueued += 1;
                }
            }
        }

        let committed = outcome.is_complete() || self.fetch_policy == FetchPolicy::FailOpen;
        if committed {
            match direction {
                ScanDirection::Forward => self.planner.commit_forward(&mut state.frontiers, window),
                ScanDirection::Backfill => {
                    self.planner.commit_backfill(&mut state.frontiers, window, head);
                }
            }
        }

        state.windows_scanned += 1;
        let report = WindowReport {
            ordinal: state.windows_scanned,
            direction,
            window,
            found: window_found.len(),
            enqueued,
            failed_ranges: outcome.failed_ranges,
            committed,
        };
        info!(
            ordinal = report.ordinal,
            direction = %direction,
            window = %window,
            found = report.found,
            enqueued = report.enqueued,
            failed_ranges = report.failed_ranges,
            seen_total = state.dedup.seen_len(),
            backlog_total = state.dedup.backlog_len(),
            "window scanned"
        );
        tick_found.extend(window_found);
        report
    }
}
