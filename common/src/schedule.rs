use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Recurring tick source of the display loop.
///
/// The first tick completes immediately. A tick that is late because a fetch ran long
/// delays the following ones instead of bursting to catch up.
pub struct Scheduler {
    interval: Interval,
}

impl Scheduler {
    /// Must be called from within a tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn next_tick(&mut self) -> Instant {
        self.interval.tick().await
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

/// Cancellation token shared between the display loop and its handles.
#[derive(Clone, Debug)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once [`Shutdown::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
