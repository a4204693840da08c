use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Duration, Instant};

/// Paces requests to the exchange.
///
/// Binance weighs klines requests against a per-minute budget per IP; exceeding it
/// yields 429 and eventually a 418 ban, so every page request goes through here.
pub struct RateLimiter {
    /// Caps in-flight requests
    semaphore: Arc<Semaphore>,
    /// When the previous request was let through
    last_request: Mutex<Instant>,
    /// Minimum spacing between two requests
    min_delay: Duration,
}

impl RateLimiter {
    /// `requests_per_minute` must be non-zero.
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let min_delay_ms = 60_000 / requests_per_minute.max(1) as u64;
        let min_delay = Duration::from_millis(min_delay_ms);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Mutex::new(Instant::now() - min_delay),
            min_delay,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Waits for a free slot and for `min_delay` to pass since the previous request.
    /// The slot is released when the returned guard drops.
    pub async fn acquire(&self) -> RateLimitGuard {
        // The semaphore is never closed, so a failed acquire only drops the concurrency cap.
        let permit = self.semaphore.clone().acquire_owned().await.ok();

        let wait_time = {
            let last = self.last_request.lock();
            let elapsed = last.elapsed();
            (elapsed < self.min_delay).then(|| self.min_delay - elapsed)
        };

        if let Some(delay) = wait_time {
            sleep(delay).await;
        }

        *self.last_request.lock() = Instant::now();

        RateLimitGuard { _permit: permit }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

pub struct RateLimitGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
