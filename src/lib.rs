//! Debt-Scanner discovers debtor addresses by scanning lending pool `Borrow` event logs.
//!
//! The main entry point is [`DebtScanner`], built via [`DebtScannerBuilder`] on top of a
//! [`ChainClient`].
//!
//! The scanner is reactive: it schedules nothing itself. The embedding process calls
//! [`DebtScanner::on_tick`] whenever it learns a new chain head and
//! [`DebtScanner::on_borrow`] for live events it has already decoded, then collects
//! discovered addresses with [`DebtScanner::drain_backlog`].
//!
//! # Scan directions
//!
//! Each tick advances a *forward* frontier toward the head in fixed-width windows, in
//! strictly ascending order. Once forward scanning is caught up, a *backfill* frontier
//! walks older history backward toward block 1, rate limited by head progress so the
//! live chain always takes priority. Together the two directions converge on complete
//! coverage of the pool's history.
//!
//! # Deduplication
//!
//! Every borrower is remembered together with the highest block height it was seen at.
//! An address re-enters the pending backlog only when observed at a strictly higher
//! height, so overlapping windows, restarts and live events all collapse into at most
//! one backlog entry per address.
//!
//! # Concurrency
//!
//! Ticks and live events may arrive concurrently. All mutable state sits behind a
//! single timeout-bounded guard: a caller that cannot acquire it in time reports
//! [`TickOutcome::Contended`] / [`LiveOutcome::Contended`] and drops that unit of work.
//! Later ticks re-cover the same block ranges, so a skipped tick loses no events.
//!
//! # Checkpointing
//!
//! With a checkpoint path configured, [`DebtScanner::save_checkpoint`] atomically
//! persists frontiers, seen heights and the backlog as JSON; the builder resumes from
//! that file on startup and reconciles stale frontiers against the current head. A
//! missing or corrupt file falls back to a fresh start.
//!
//! # Chain clients
//!
//! The [`chain_client`] module provides [`ChainClient`], a thin provider wrapper that
//! retries transient RPC failures with exponential backoff and bounds every call with
//! a timeout.

#[macro_use]
mod logging;

pub mod chain_client;
pub mod scanner;

mod error;
mod types;

pub use chain_client::{
    ChainClient, ChainClientBuilder, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_RETRIES, DEFAULT_MIN_DELAY,
};

pub use error::ScannerError;
pub use types::{
    LiveOutcome, LogRecord, ScanDirection, ScanWindow, ScannerResult, StateSummary, TickOutcome,
    TickReport, WindowReport,
};

pub use scanner::{
    DEFAULT_CHUNK_SIZE, DEFAULT_GUARD_TIMEOUT, DEFAULT_MAX_WINDOWS_PER_TICK, DEFAULT_SCAN_INTERVAL,
    DEFAULT_SUB_CHUNK_SIZE, DebtScanner, DebtScannerBuilder, FetchPolicy,
};
