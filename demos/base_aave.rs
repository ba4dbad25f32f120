//! Scans the Aave v3 pool on Base mainnet for debtor addresses.
//!
//! Run with `cargo run --example base_aave --features tracing`. Point `RPC_URL`
//! at your own endpoint to avoid the public rate limits. State is checkpointed
//! to `debt-scanner.json` in the working directory, so the scan resumes where
//! it left off.

use std::time::Duration;

use alloy::primitives::{Address, address};
use debt_scanner::{ChainClientBuilder, DebtScannerBuilder, TickOutcome};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const AAVE_V3_POOL: Address = address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5");

const RESERVES: [Address; 4] = [
    // WETH
    address!("4200000000000000000000000000000000000006"),
    // cbETH
    address!("2Ae3F1Ec7F1F5012CFEab0185bfc7aa3cf0DEc22"),
    // cbBTC
    address!("cbB7C0000aB88B473b1f5aFd9ef808440eed33Bf"),
    // wstETH
    address!("c1CBa3fCea344f92D9239c08C0568f6F2F0ee452"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();

    let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| "https://mainnet.base.org".into());
    let client = ChainClientBuilder::connect(&rpc_url).await?.build();

    let scanner = DebtScannerBuilder::new(AAVE_V3_POOL)
        .instruments(RESERVES)
        .checkpoint_path("debt-scanner.json")
        .connect(client.clone())
        .await?;

    // Base produces a block every 2 seconds; one tick per ~6 blocks keeps the
    // scanner comfortably ahead without hammering the endpoint.
    let mut ticker = tokio::time::interval(Duration::from_secs(12));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let head = match client.head_number().await {
                    Ok(head) => head,
                    Err(e) => {
                        error!("head query failed: {e}");
                        continue;
                    }
                };

                match scanner.on_tick(head).await {
                    TickOutcome::Scanned(report) => {
                        for debtor in scanner.drain_backlog().await {
                            info!(%debtor, head, "debtor discovered");
                        }
                        if !report.caught_up {
                            info!(
                                head,
                                forward_frontier = report.forward_frontier,
                                "still catching up"
                            );
                        }
                    }
                    TickOutcome::Contended => info!(head, "tick skipped, scanner busy"),
                }

                if let Err(e) = scanner.save_checkpoint().await {
                    error!("checkpoint save failed: {e}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let summary = scanner.summary().await;
    info!(
        forward_frontier = summary.forward_frontier,
        backfill_frontier = ?summary.backfill_frontier,
        seen = summary.seen_len,
        backlog = summary.backlog_len,
        "shutting down"
    );
    scanner.save_checkpoint().await?;

    Ok(())
}
