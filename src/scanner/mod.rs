//! Incremental debtor discovery from lending pool borrow events.
//!
//! Example usage:
//!
//! ```rust,no_run
//! use alloy::primitives::address;
//! use debt_scanner::{ChainClientBuilder, DebtScannerBuilder, TickOutcome};
//! use tokio::time::{Duration, interval};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tracing_subscriber::fmt::init();
//!
//!     let client = ChainClientBuilder::connect("https://mainnet.base.org").await?.build();
//!
//!     let scanner = DebtScannerBuilder::new(address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"))
//!         .instrument(address!("4200000000000000000000000000000000000006"))
//!         .checkpoint_path("debt-scanner.json")
//!         .connect(client.clone())
//!         .await?;
//!
//!     let mut ticker = interval(Duration::from_secs(12));
//!     loop {
//!         ticker.tick().await;
//!         let head = client.head_number().await?;
//!         if let TickOutcome::Scanned(report) = scanner.on_tick(head).await {
//!             println!("head {}: {} new debtor(s)", report.head, report.enqueued);
//!             for debtor in scanner.drain_backlog().await {
//!                 println!("  {debtor}");
//!             }
//!         }
//!         scanner.save_checkpoint().await?;
//!     }
//! }
//! ```

mod builder;
mod checkpoint;
mod coordinator;
mod dedup;
mod extractor;
mod fetcher;
mod guard;
mod planner;
mod splitter;
mod state;

pub use builder::{
    DEFAULT_CHUNK_SIZE, DEFAULT_GUARD_TIMEOUT, DEFAULT_MAX_WINDOWS_PER_TICK, DEFAULT_SCAN_INTERVAL,
    DEFAULT_SUB_CHUNK_SIZE, DebtScannerBuilder,
};
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use coordinator::DebtScanner;
pub use fetcher::{Borrow, FetchPolicy, decode_borrow};
pub use splitter::RangeSplitter;
