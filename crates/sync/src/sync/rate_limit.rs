//! Fixed pacing and retry-once-on-429 for store calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::shopify::StoreError;

/// Spacing between consecutive store calls.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(800);
/// Spacing between consecutive list pages.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);
/// Wait before the single retry of a throttled call.
pub const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_millis(2000);

/// Keeps sustained throughput under Shopify's ~2 requests/second ceiling.
///
/// Throttled calls get exactly one retry after a fixed cooldown; a second
/// 429 is returned to the caller as a terminal error, so a bulk run always
/// finishes in bounded time.
///
/// Clones share one gate: a call and its trailing delay hold it, so calls
/// from concurrent tasks stay spaced by at least the call delay.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    call_delay: Duration,
    page_delay: Duration,
    cooldown: Duration,
    gate: Arc<Mutex<()>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(
            DEFAULT_CALL_DELAY,
            DEFAULT_PAGE_DELAY,
            DEFAULT_RATE_LIMIT_COOLDOWN,
        )
    }
}

impl RateLimiter {
    #[must_use]
    pub fn new(call_delay: Duration, page_delay: Duration, cooldown: Duration) -> Self {
        Self {
            call_delay,
            page_delay,
            cooldown,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// A limiter that never sleeps.
    #[must_use]
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub const fn call_delay(&self) -> Duration {
        self.call_delay
    }

    #[must_use]
    pub const fn page_delay(&self) -> Duration {
        self.page_delay
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Run one store call, retrying once after the cooldown if throttled,
    /// then wait the inter-call delay whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the call's error; for a throttled call that is the error of
    /// the retry.
    pub async fn call<T, F, Fut>(&self, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let _slot = self.gate.lock().await;
        let result = match op().await {
            Err(e) if e.is_rate_limited() => {
                warn!(
                    cooldown_ms = self.cooldown.as_millis(),
                    "Rate limited, retrying once after cooldown"
                );
                tokio::time::sleep(self.cooldown).await;
                op().await
            }
            other => other,
        };

        sleep_unless_zero(self.call_delay).await;
        result
    }

    /// Wait the inter-call delay, holding the gate.
    pub async fn pace(&self) {
        let _slot = self.gate.lock().await;
        sleep_unless_zero(self.call_delay).await;
    }

    /// Wait the inter-page delay.
    pub async fn page_pause(&self) {
        sleep_unless_zero(self.page_delay).await;
    }
}

async fn sleep_unless_zero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
