use std::fmt;

use alloy::primitives::{Address, BlockNumber};

use crate::ScannerError;

pub type ScannerResult<T> = Result<T, ScannerError>;

/// An inclusive block range, `start <= stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: BlockNumber,
    pub stop: BlockNumber,
}

impl ScanWindow {
    pub(crate) const fn new(start: BlockNumber, stop: BlockNumber) -> Self {
        Self { start, stop }
    }

    /// Number of blocks covered by the window.
    #[must_use]
    pub const fn blocks(&self) -> u64 {
        self.stop - self.start + 1
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

/// A decoded borrow observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// Height at which the event was emitted.
    pub height: BlockNumber,
    /// The reserve the debt was taken in.
    pub instrument: Address,
    /// The address that now carries the debt.
    pub borrower: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Backfill,
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDirection::Forward => f.write_str("forward"),
            ScanDirection::Backfill => f.write_str("backfill"),
        }
    }
}

/// Per-window counters, one entry per window processed during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowReport {
    /// Running window counter over the scanner's lifetime.
    pub ordinal: u64,
    pub direction: ScanDirection,
    pub window: ScanWindow,
    /// Unique addresses extracted from this window, before dedup.
    pub found: usize,
    /// Observations fresh enough to enter the backlog from this window.
    pub enqueued: usize,
    /// Sub-ranges whose retrieval failed and yielded no records.
    pub failed_ranges: usize,
    /// Whether the window's frontier advance was committed.
    pub committed: bool,
}

/// Aggregated result of one [`on_tick`](crate::DebtScanner::on_tick) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Head height the tick was invoked with.
    pub head: BlockNumber,
    pub windows: Vec<WindowReport>,
    /// Unique addresses observed across all windows of this tick.
    pub found: usize,
    /// Fresh observations enqueued across all windows of this tick.
    pub enqueued: usize,
    /// False while forward scanning is still behind `head` after the
    /// bounded number of windows; backfill is deferred in that case.
    pub caught_up: bool,
    pub forward_frontier: BlockNumber,
    pub backfill_frontier: Option<BlockNumber>,
    pub backlog_len: usize,
    pub seen_len: usize,
}

/// Outcome of a tick: either a completed scan pass or a skip because the
/// state guard could not be acquired in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Scanned(TickReport),
    Contended,
}

impl TickOutcome {
    /// The report, if the tick ran.
    #[must_use]
    pub fn report(&self) -> Option<&TickReport> {
        match self {
            TickOutcome::Scanned(report) => Some(report),
            TickOutcome::Contended => None,
        }
    }
}

/// Outcome of ingesting one live event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    /// The borrower was enqueued into the backlog.
    Enqueued,
    /// The borrower was already seen at this height or later.
    Stale,
    /// The record's instrument is not in the tracked set.
    NotTracked,
    /// The state guard could not be acquired in time.
    Contended,
}

/// Point-in-time view of the scanner state, taken under the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSummary {
    pub forward_frontier: BlockNumber,
    pub backfill_frontier: Option<BlockNumber>,
    pub last_backfill_tick: BlockNumber,
    pub seen_len: usize,
    pub backlog_len: usize,
}
