use std::time::Duration;

use tokio::{
    sync::{Mutex, MutexGuard},
    time::timeout,
};

/// Timeout-bounded mutual exclusion over the scanner state.
///
/// Scan entry points acquire through [`acquire`](Self::acquire): if the lock
/// is not free within the configured window the caller abandons this
/// invocation and the next tick retries naturally. Waiting indefinitely is
/// reserved for paths where dropping the work is worse than waiting, such
/// as shutdown serialization.
#[derive(Debug)]
pub struct StateGuard<T> {
    inner: Mutex<T>,
    acquire_timeout: Duration,
}

impl<T> StateGuard<T> {
    pub fn new(value: T, acquire_timeout: Duration) -> Self {
        Self { inner: Mutex::new(value), acquire_timeout }
    }

    /// Lock within the configured timeout. `None` means contended.
    pub async fn acquire(&self) -> Option<MutexGuard<'_, T>> {
        timeout(self.acquire_timeout, self.inner.lock()).await.ok()
    }

    /// Lock, waiting as long as it takes.
    pub async fn wait(&self) -> MutexGuard<'_, T> {
        self.inner.lock().await
    }
}
