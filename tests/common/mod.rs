//! Shared harness for exercising the scanner against a mocked transport.
//!
//! The mock asserter serves queued responses in FIFO order, so each test
//! pushes exactly the responses its tick choreography will consume: one for
//! the builder's initial head query, then one per `eth_getLogs` request.

#![allow(dead_code)]

use alloy::{
    network::Ethereum,
    primitives::{Address, BlockNumber, Log as PrimitiveLog, U256},
    providers::{RootProvider, mock::Asserter},
    rpc::{client::RpcClient, types::Log},
    sol_types::SolEvent,
};
use debt_scanner::{
    ChainClient, ChainClientBuilder, DebtScanner, DebtScannerBuilder, ScanWindow, TickOutcome,
    TickReport, scanner::Borrow,
};

pub const POOL: Address = Address::repeat_byte(0xf0);
pub const RESERVE: Address = Address::repeat_byte(0x11);
pub const OTHER_RESERVE: Address = Address::repeat_byte(0x22);

pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);

pub fn mocked_client(asserter: &Asserter) -> ChainClient {
    let provider = RootProvider::<Ethereum>::new(RpcClient::mocked(asserter.clone()));
    ChainClientBuilder::fragile(provider).build()
}

/// Builds a scanner over the mocked transport: chunk 100, one request per
/// window, backfill due after 5 blocks of head progress.
pub async fn build_scanner(
    asserter: &Asserter,
    head: BlockNumber,
    configure: impl FnOnce(DebtScannerBuilder) -> DebtScannerBuilder,
) -> anyhow::Result<DebtScanner> {
    push_head(asserter, head);
    let builder = DebtScannerBuilder::new(POOL)
        .instrument(RESERVE)
        .chunk_size(100)
        .sub_chunk_size(100)
        .scan_interval(5);
    Ok(configure(builder).connect(mocked_client(asserter)).await?)
}

/// Queues the response for one head-number query.
pub fn push_head(asserter: &Asserter, head: BlockNumber) {
    asserter.push_success(&format!("0x{head:x}"));
}

/// Queues the response for one `eth_getLogs` request.
pub fn push_logs(asserter: &Asserter, logs: &[Log]) {
    asserter.push_success(&logs.to_vec());
}

pub fn push_empty(asserter: &Asserter) {
    push_logs(asserter, &[]);
}

/// Runs one tick, panicking if it was contended.
pub async fn tick(scanner: &DebtScanner, head: BlockNumber) -> TickReport {
    match scanner.on_tick(head).await {
        TickOutcome::Scanned(report) => report,
        TickOutcome::Contended => panic!("tick at head {head} unexpectedly contended"),
    }
}

pub fn window(start: BlockNumber, stop: BlockNumber) -> ScanWindow {
    ScanWindow { start, stop }
}

/// A well-formed pool `Borrow` log, as the RPC would return it.
pub fn borrow_log(reserve: Address, borrower: Address, height: BlockNumber) -> Log {
    let event = Borrow {
        reserve,
        user: borrower,
        onBehalfOf: borrower,
        amount: U256::from(1_000),
        interestRateMode: 2,
        borrowRate: U256::from(42),
        referralCode: 0,
    };
    Log {
        inner: PrimitiveLog { address: POOL, data: event.encode_log_data() },
        block_hash: None,
        block_number: Some(height),
        block_timestamp: None,
        transaction_hash: None,
        transaction_index: None,
        log_index: None,
        removed: false,
    }
}
