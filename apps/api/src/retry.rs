//! Exponential backoff shared by the outbound HTTP clients.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub enum Attempt<E> {
    /// Worth another try (transport failure, 429, 5xx).
    Retry(E),
    /// Fail immediately.
    Fatal(E),
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (1-based): base, 2×base, 4×base, …
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }

    /// Runs `op` until it succeeds, fails fatally, or the attempts run out.
    /// The error of the last attempt is returned.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Attempt<E>>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Retry(e)) if attempt >= self.max_attempts => return Err(e),
                Err(Attempt::Retry(e)) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} attempt {} failed ({}), retrying after {}ms...",
                        label,
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
