//! Periodic refresh of the published snapshot.
//!
//! The scheduler runs one background task. On start it performs an hourly
//! and a daily cycle immediately; afterwards the hourly cycle repeats every
//! interval. The daily cycle runs once, and is retried on later ticks only
//! until it has succeeded.
//!
//! Stopping cancels future ticks. A cycle already in flight runs to
//! completion but its result is discarded.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::forecast::ForecastService;
use super::snapshot::SnapshotPublisher;

/// Default hourly refresh period.
pub const DEFAULT_HOURLY_INTERVAL: Duration = Duration::from_secs(3600);

/// Lifecycle of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Refresh loop owner before it is started.
pub struct RefreshScheduler {
    service: ForecastService,
    publisher: SnapshotPublisher,
    hourly_interval: Duration,
    state: Arc<RwLock<SchedulerState>>,
}

impl RefreshScheduler {
    pub fn new(service: ForecastService, publisher: SnapshotPublisher) -> Self {
        Self {
            service,
            publisher,
            hourly_interval: DEFAULT_HOURLY_INTERVAL,
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
        }
    }

    /// Override the hourly period. A zero period falls back to the default.
    pub fn with_hourly_interval(mut self, interval: Duration) -> Self {
        self.hourly_interval = if interval.is_zero() {
            DEFAULT_HOURLY_INTERVAL
        } else {
            interval
        };
        self
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    /// Spawn the refresh task on the current tokio runtime.
    pub fn start(self) -> RefreshHandle {
        let cancel = CancellationToken::new();
        let trigger = Arc::new(Notify::new());
        *self.state.write() = SchedulerState::Running;
        info!(
            "Starting forecast refresh every {:?} for location {}",
            self.hourly_interval,
            self.service.settings().location_id
        );

        let state = Arc::clone(&self.state);
        let task = tokio::spawn(run(
            self.service,
            self.publisher,
            self.hourly_interval,
            cancel.clone(),
            Arc::clone(&trigger),
            Arc::clone(&state),
        ));

        RefreshHandle {
            cancel,
            trigger,
            state,
            task,
        }
    }
}

/// Control handle of a running scheduler.
///
/// Dropping the handle does not stop the task; call [`RefreshHandle::stop`].
pub struct RefreshHandle {
    cancel: CancellationToken,
    trigger: Arc<Notify>,
    state: Arc<RwLock<SchedulerState>>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop scheduling further cycles.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            info!("Stopping forecast refresh");
            self.cancel.cancel();
        }
        *self.state.write() = SchedulerState::Stopped;
    }

    /// Wait for the background task to exit.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Forecast refresh task ended abnormally: {}", e);
        }
    }

    /// Stop, then wait for the task.
    pub async fn shutdown(self) {
        self.stop();
        self.join().await;
    }

    /// Run an hourly cycle now, outside the regular schedule.
    pub fn refresh_now(&self) {
        self.trigger.notify_one();
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.read()
    }

    /// Detached trigger for callers that do not own the handle.
    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            notify: Arc::clone(&self.trigger),
            cancel: self.cancel.clone(),
        }
    }
}

/// Cloneable out-of-band refresh request.
#[derive(Clone)]
pub struct RefreshTrigger {
    notify: Arc<Notify>,
    cancel: CancellationToken,
}

impl RefreshTrigger {
    /// Request an immediate hourly cycle. Returns `false` once stopped.
    pub fn request(&self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.notify.notify_one();
        true
    }
}

async fn run(
    service: ForecastService,
    publisher: SnapshotPublisher,
    hourly_interval: Duration,
    cancel: CancellationToken,
    trigger: Arc<Notify>,
    state: Arc<RwLock<SchedulerState>>,
) {
    let mut ticker = tokio::time::interval(hourly_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut daily_loaded = false;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            _ = trigger.notified() => debug!("Out-of-band hourly refresh requested"),
        }

        match service.refresh_hourly().await {
            Ok(forecast) if !cancel.is_cancelled() => {
                publisher.publish_hourly(forecast);
            }
            Ok(_) => debug!("Discarding hourly forecast fetched after stop"),
            Err(e) => error!("Hourly refresh failed, keeping previous snapshot: {}", e),
        }

        if !daily_loaded && !cancel.is_cancelled() {
            match service.refresh_daily().await {
                Ok(forecast) if !cancel.is_cancelled() => {
                    publisher.publish_daily(forecast);
                    daily_loaded = true;
                }
                Ok(_) => debug!("Discarding daily forecast fetched after stop"),
                Err(e) => error!("Daily refresh failed, will retry next tick: {}", e),
            }
        }
    }

    *state.write() = SchedulerState::Stopped;
    debug!("Forecast refresh task exited");
}
