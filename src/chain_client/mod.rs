//! Retrying, timeout-bounded wrapper around an Alloy provider.
//!
//! This module exposes [`ChainClient`], a small wrapper around Alloy's
//! [`RootProvider`](alloy::providers::RootProvider) that adds:
//! * a bounded per-call deadline
//! * exponential backoff retries on transport errors
//!
//! The scanner issues exactly two kinds of calls through it:
//! `eth_blockNumber` for head discovery and `eth_getLogs` for window
//! retrieval. Keeping the deadline short relative to the tick cadence is
//! what bounds how long a scan pass can hold the state guard.
//!
//! # Examples
//!
//! ```rust,no_run
//! use debt_scanner::chain_client::ChainClientBuilder;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = ChainClientBuilder::connect("https://mainnet.base.org")
//!     .await?
//!     .call_timeout(Duration::from_secs(5))
//!     .build();
//!
//! let head = client.head_number().await?;
//! println!("current head: {head}");
//! # Ok(()) }
//! ```

pub mod builder;
pub mod client;

pub use builder::*;
pub use client::ChainClient;
