//! Test ticker — a `Ticker` driven explicitly by the test.

use async_trait::async_trait;
use taleweaver_core::schedule::Ticker;
use tokio::sync::{mpsc, oneshot};

/// Creates a connected [`TickSender`] / [`ManualTicker`] pair.
#[must_use]
pub fn manual_ticker() -> (TickSender, ManualTicker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        TickSender { tx },
        ManualTicker {
            rx,
            in_flight: None,
        },
    )
}

/// A ticker that only fires when the paired [`TickSender`] says so.
///
/// Each tick stays "in flight" until the consumer asks for the next one
/// (or drops the ticker), which lets the test wait for the consumer to
/// finish handling it.
#[derive(Debug)]
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<oneshot::Sender<()>>,
    in_flight: Option<oneshot::Sender<()>>,
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        if let Some(done) = self.in_flight.take() {
            let _ = done.send(());
        }
        match self.rx.recv().await {
            Some(done) => {
                self.in_flight = Some(done);
                true
            }
            None => false,
        }
    }
}

/// Test-side handle that fires ticks on a [`ManualTicker`].
#[derive(Debug, Clone)]
pub struct TickSender {
    tx: mpsc::UnboundedSender<oneshot::Sender<()>>,
}

impl TickSender {
    /// Fires one tick and waits until the consumer has handled it.
    ///
    /// Returns `true` if the consumer asked for another tick afterwards and
    /// `false` if it stopped ticking (dropped the ticker).
    pub async fn tick(&self) -> bool {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(done_tx).is_err() {
            return false;
        }
        done_rx.await.is_ok()
    }
}
