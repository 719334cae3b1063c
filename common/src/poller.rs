use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::MonitorConfig;
use crate::schedule::{Scheduler, Shutdown};
use crate::sensor::{now_millis, Reading};
use crate::source::SensorSource;
use crate::state::{DashboardSnapshot, DashboardState, Notification};

/// Receives everything the display loop wants shown.
///
/// Implementations are called from the loop's runtime and are responsible for moving
/// the data onto the rendering thread.
pub trait DisplaySink: Send + Sync + 'static {
    fn render(&self, snapshot: DashboardSnapshot);

    fn notify(&self, notification: Notification);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Arc<T> {
    fn render(&self, snapshot: DashboardSnapshot) {
        (**self).render(snapshot)
    }

    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// What started a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Scheduled,
    Manual,
}

/// Answer to [`LoopHandle::request_refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshRequest {
    /// A fetch will start right away.
    Accepted,

    /// A fetch is already outstanding or queued; no extra one is made.
    Coalesced,

    /// The loop is gone.
    Closed,
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Updated(Reading),
    Failed(Notification),
}

enum Command {
    Refresh,
}

/// Cloneable remote control of a running [`DisplayLoop`].
#[derive(Clone)]
pub struct LoopHandle {
    commands: mpsc::Sender<Command>,
    in_flight: Arc<AtomicBool>,
    shutdown: Shutdown,
}

impl LoopHandle {
    /// Asks for an immediate fetch outside the regular schedule.
    pub fn request_refresh(&self) -> RefreshRequest {
        if self.shutdown.is_cancelled() {
            return RefreshRequest::Closed;
        }
        if self.in_flight.load(Ordering::Acquire) {
            log::debug!("Refresh coalesced with the fetch in flight");
            return RefreshRequest::Coalesced;
        }

        match self.commands.try_send(Command::Refresh) {
            Ok(()) => RefreshRequest::Accepted,
            Err(mpsc::error::TrySendError::Full(_)) => RefreshRequest::Coalesced,
            Err(mpsc::error::TrySendError::Closed(_)) => RefreshRequest::Closed,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Stops the loop, abandoning a fetch that is still outstanding.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// The polling display loop.
///
/// Owns the dashboard state and is the only thing mutating it. Every tick fetches one
/// reading, folds it into the state and publishes a fresh snapshot to the sink. Fetches
/// are awaited inline, so there is never more than one in flight.
pub struct DisplayLoop<S, D> {
    source: S,
    sink: D,
    state: DashboardState,
    period: Duration,
    clock: fn() -> i64,

    commands_tx: mpsc::Sender<Command>,
    commands_rx: mpsc::Receiver<Command>,
    in_flight: Arc<AtomicBool>,
    shutdown: Shutdown,
}

impl<S: SensorSource, D: DisplaySink> DisplayLoop<S, D> {
    pub fn new(source: S, sink: D, config: &MonitorConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(1);

        Self {
            source,
            sink,
            state: DashboardState::new(config.window_capacity),
            period: config.poll_interval(),
            clock: now_millis,
            commands_tx,
            commands_rx,
            in_flight: Arc::new(AtomicBool::new(false)),
            shutdown: Shutdown::new(),
        }
    }

    /// Replaces the wall clock used to stamp light samples.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            commands: self.commands_tx.clone(),
            in_flight: self.in_flight.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Runs one fetch and publishes the result.
    pub async fn tick(&mut self, trigger: Trigger) -> TickOutcome {
        self.in_flight.store(true, Ordering::Release);
        let manual = trigger == Trigger::Manual;
        self.state.begin_fetch(manual);
        if manual {
            self.sink.render(self.state.snapshot());
        }

        let outcome = match self.source.fetch().await {
            Ok(body) => Reading::from_json(&body),
            Err(err) => Err(err),
        };
        match &outcome {
            Ok(reading) => log::debug!("{trigger:?} fetch: {reading:?}"),
            Err(err) => log::error!("{trigger:?} fetch failed: {err}"),
        }

        let result = self.state.complete(outcome, (self.clock)());
        self.sink.render(self.state.snapshot());
        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(reading) => TickOutcome::Updated(reading),
            Err(notification) => {
                self.sink.notify(notification.clone());
                TickOutcome::Failed(notification)
            }
        }
    }

    /// Ticks on the configured schedule and on refresh requests until shut down.
    pub async fn run(mut self) {
        let mut scheduler = Scheduler::new(self.period);
        let shutdown = self.shutdown.clone();
        log::info!("Display loop started, polling every {:?}", scheduler.period());

        loop {
            let trigger = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(Command::Refresh) = self.commands_rx.recv() => Trigger::Manual,
                _ = scheduler.next_tick() => Trigger::Scheduled,
            };

            // This fetch answers any refresh that queued up meanwhile.
            while self.commands_rx.try_recv().is_ok() {}

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = self.tick(trigger) => {}
            }
        }

        self.in_flight.store(false, Ordering::Release);
        log::info!("Display loop stopped");
    }
}
