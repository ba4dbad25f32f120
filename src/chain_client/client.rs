use std::{sync::Arc, time::Duration};

use alloy::{
    network::Ethereum,
    providers::{Provider, RootProvider},
    rpc::types::{Filter, Log},
    transports::{RpcError, TransportErrorKind},
};
use backon::{ExponentialBuilder, Retryable};
use thiserror::Error;
use tokio::time::timeout;

/// Errors produced by [`ChainClient`] calls.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The underlying RPC transport returned an error.
    #[error("RPC error: {0}")]
    RpcError(Arc<RpcError<TransportErrorKind>>),

    /// The call did not complete within the configured timeout.
    #[error("Operation timed out")]
    Timeout,
}

impl From<RpcError<TransportErrorKind>> for Error {
    fn from(error: RpcError<TransportErrorKind>) -> Self {
        Error::RpcError(Arc::new(error))
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Error::Timeout
    }
}

/// Provider wrapper with built-in retry and timeout mechanisms.
///
/// Every call runs under a total deadline (`call_timeout`) and is retried
/// with exponential backoff up to `max_retries` on transport errors.
#[derive(Clone, Debug)]
pub struct ChainClient {
    pub(crate) provider: RootProvider<Ethereum>,
    pub(crate) call_timeout: Duration,
    pub(crate) max_retries: usize,
    pub(crate) min_delay: Duration,
}

impl ChainClient {
    /// Get a reference to the wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &RootProvider<Ethereum> {
        &self.provider
    }

    /// Fetch the current chain head height with retry and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the deadline elapses, or
    /// [`Error::RpcError`] once retries are exhausted.
    pub async fn head_number(&self) -> Result<u64, Error> {
        trace!("eth_blockNumber called");
        let result = self
            .with_retry(move |provider| async move { provider.get_block_number().await })
            .await;
        if let Err(e) = &result {
            error!(error = %e, "eth_blockNumber failed");
        }
        result
    }

    /// Fetch logs for the given [`Filter`] with retry and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the deadline elapses, or
    /// [`Error::RpcError`] once retries are exhausted.
    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, Error> {
        trace!("eth_getLogs called");
        let result =
            self.with_retry(move |provider| async move { provider.get_logs(filter).await }).await;
        if let Err(e) = &result {
            error!(error = %e, "eth_getLogs failed");
        }
        result
    }

    /// Execute `operation` with exponential backoff under a total timeout.
    ///
    /// The deadline covers all attempts including time spent inside the RPC
    /// calls, so one call can never stall the caller past `call_timeout`.
    pub(crate) async fn with_retry<T, F, Fut>(&self, operation: F) -> Result<T, Error>
    where
        F: Fn(RootProvider<Ethereum>) -> Fut,
        Fut: Future<Output = Result<T, RpcError<TransportErrorKind>>>,
    {
        let retry_strategy = ExponentialBuilder::default()
            .with_max_times(self.max_retries)
            .with_min_delay(self.min_delay);

        timeout(
            self.call_timeout,
            (|| operation(self.provider.clone()))
                .retry(retry_strategy)
                .notify(|err: &RpcError<TransportErrorKind>, dur: Duration| {
                    info!(error = %err, delay = ?dur, "transient RPC error, retrying");
                })
                .sleep(tokio::time::sleep),
        )
        .await
        .map_err(Error::from)?
        .map_err(Error::from)
    }
}
