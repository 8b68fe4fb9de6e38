//! Tick source abstraction for polling.
//!
//! In production ticks come from a fixed-delay timer. In tests a manually
//! driven implementation is injected so every tick is explicit.

use std::time::Duration;

use async_trait::async_trait;

/// Period between generation status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// A source of polling ticks.
///
/// The next tick is only requested once the caller has finished handling
/// the previous one, so a slow status check delays the following tick
/// instead of queueing a burst.
#[async_trait]
pub trait Ticker: Send {
    /// Waits for the next tick. Returns `false` once no further ticks will
    /// ever be produced.
    async fn tick(&mut self) -> bool;
}

#[async_trait]
impl<T: Ticker + ?Sized> Ticker for Box<T> {
    async fn tick(&mut self) -> bool {
        (**self).tick().await
    }
}

/// Production ticker: each tick fires one full period after it was
/// requested.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayTicker {
    period: Duration,
}

impl FixedDelayTicker {
    /// Creates a ticker with the given period.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for FixedDelayTicker {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

#[async_trait]
impl Ticker for FixedDelayTicker {
    async fn tick(&mut self) -> bool {
        tokio::time::sleep(self.period).await;
        true
    }
}
