//! Published forecast snapshot.
//!
//! A single [`SnapshotPublisher`] replaces the snapshot wholesale; any number
//! of [`SnapshotReader`]s observe it. Readers always see a complete snapshot,
//! never a half-applied update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::forecast::{DailyForecast, HourlyForecast};
use crate::models::{DisplaySeriesPoint, ObservationRecord};

/// Everything handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub current_hour: Option<ObservationRecord>,
    pub current_day: Option<ObservationRecord>,
    pub hourly: Vec<DisplaySeriesPoint>,
    pub daily: Vec<DisplaySeriesPoint>,
    pub hourly_refreshed_at: Option<DateTime<Utc>>,
    pub daily_refreshed_at: Option<DateTime<Utc>>,
}

impl ForecastSnapshot {
    /// Nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.hourly_refreshed_at.is_none() && self.daily_refreshed_at.is_none()
    }
}

/// Create a publisher/reader pair starting from the empty snapshot.
pub fn snapshot_channel() -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::new(ForecastSnapshot::default()));
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

/// Write side of the snapshot. Not `Clone`: there is one writer.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<ForecastSnapshot>>,
}

impl SnapshotPublisher {
    /// Replace the hourly part, keeping the daily part.
    pub fn publish_hourly(&self, forecast: HourlyForecast) -> Arc<ForecastSnapshot> {
        info!(
            "Publishing hourly forecast: {} points, current hour {}",
            forecast.series.len(),
            if forecast.current.is_some() { "available" } else { "unavailable" }
        );
        self.replace(|snapshot| {
            snapshot.current_hour = forecast.current;
            snapshot.hourly = forecast.series;
            snapshot.hourly_refreshed_at = Some(forecast.fetched_at);
        })
    }

    /// Replace the daily part, keeping the hourly part.
    pub fn publish_daily(&self, forecast: DailyForecast) -> Arc<ForecastSnapshot> {
        info!("Publishing daily forecast: {} points", forecast.series.len());
        self.replace(|snapshot| {
            snapshot.current_day = forecast.current;
            snapshot.daily = forecast.series;
            snapshot.daily_refreshed_at = Some(forecast.fetched_at);
        })
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<ForecastSnapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// A new reader of this publisher.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }

    fn replace(&self, update: impl FnOnce(&mut ForecastSnapshot)) -> Arc<ForecastSnapshot> {
        let mut next = ForecastSnapshot::clone(&self.tx.borrow());
        update(&mut next);
        let next = Arc::new(next);
        self.tx.send_replace(Arc::clone(&next));
        next
    }
}

/// Read side of the snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<ForecastSnapshot>>,
}

impl SnapshotReader {
    /// Latest published snapshot.
    pub fn current(&self) -> Arc<ForecastSnapshot> {
        Arc::clone(&self.rx.borrow())
    }

    /// Latest published snapshot, marked as seen so that [`changed`]
    /// only wakes for later publications.
    ///
    /// [`changed`]: SnapshotReader::changed
    pub fn latest(&mut self) -> Arc<ForecastSnapshot> {
        Arc::clone(&self.rx.borrow_and_update())
    }

    /// Wait for the next publication.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Arc<ForecastSnapshot>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }
}
