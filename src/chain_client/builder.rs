use std::time::Duration;

use alloy::{
    network::Ethereum,
    providers::{Provider, ProviderBuilder, RootProvider},
};

use crate::chain_client::{ChainClient, client::Error};

// RPC retry and timeout settings
/// Default total deadline for a single RPC call, retries included.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
/// Default maximum number of retry attempts.
pub const DEFAULT_MAX_RETRIES: usize = 3;
/// Default base delay between retries.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(1);

/// Builder for constructing a [`ChainClient`].
///
/// Use this to configure the per-call timeout and retry/backoff behavior.
pub struct ChainClientBuilder {
    provider: RootProvider<Ethereum>,
    call_timeout: Duration,
    max_retries: usize,
    min_delay: Duration,
}

impl ChainClientBuilder {
    /// Create a builder around an existing provider with default settings.
    #[must_use]
    pub fn new(provider: RootProvider<Ethereum>) -> Self {
        Self {
            provider,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay: DEFAULT_MIN_DELAY,
        }
    }

    /// Create a builder with no retry attempts and only the timeout set.
    ///
    /// One issued call maps to exactly one transport request, which makes
    /// behavior deterministic against mocked transports.
    #[must_use]
    pub fn fragile(provider: RootProvider<Ethereum>) -> Self {
        Self::new(provider).max_retries(0).min_delay(Duration::ZERO)
    }

    /// Connect to an RPC endpoint (`http(s)://` or `ws(s)://`) and create a
    /// builder around the resulting provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let provider = ProviderBuilder::new().connect(url).await?;
        Ok(Self::new(provider.root().to_owned()))
    }

    /// Set the total deadline for RPC operations.
    #[must_use]
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts.
    #[must_use]
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    #[must_use]
    pub fn min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Build the [`ChainClient`].
    #[must_use]
    pub fn build(self) -> ChainClient {
        debug!(
            call_timeout_ms = self.call_timeout.as_millis(),
            max_retries = self.max_retries,
            "Building ChainClient"
        );

        ChainClient {
            provider: self.provider,
            call_timeout: self.call_timeout,
            max_retries: self.max_retries,
            min_delay: self.min_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{providers::mock::Asserter, rpc::client::RpcClient};

    fn mocked_provider() -> RootProvider<Ethereum> {
        RootProvider::new(RpcClient::mocked(Asserter::new()))
    }

    #[tokio::test]
    async fn builder_applies_defaults() {
        let client = ChainClientBuilder::new(mocked_provider()).build();

        assert_eq!(client.call_timeout, DEFAULT_CALL_TIMEOUT);
        assert_eq!(client.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(client.min_delay, DEFAULT_MIN_DELAY);
    }

    #[tokio::test]
    async fn fragile_disables_retries() {
        let client = ChainClientBuilder::fragile(mocked_provider())
            .call_timeout(Duration::from_millis(200))
            .build();

        assert_eq!(client.max_retries, 0);
        assert_eq!(client.min_delay, Duration::ZERO);
        assert_eq!(client.call_timeout, Duration::from_millis(200));
    }
}
