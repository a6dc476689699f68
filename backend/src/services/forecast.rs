//! One fetch-match-build cycle per series.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use super::current::{match_current_day, match_current_hour};
use super::series::{build_daily_series, build_hourly_series};
use crate::db::repository::{ObservationRepository, RangeQuery, RepositoryError};
use crate::db::services::fetch_forecast_records;
use crate::models::{
    window_for, Clock, DisplaySeriesPoint, Locale, LocationId, ObservationRecord,
    SeriesKind, SystemClock, TimeWindow,
};

/// Errors raised by a forecast cycle.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ForecastError {
    #[error("Store query failed: {0}")]
    Store(#[from] RepositoryError),

    #[error("{series} fetch timed out after {after:?}")]
    Timeout { series: SeriesKind, after: Duration },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type ForecastResult<T> = Result<T, ForecastError>;

/// Per-site settings of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSettings {
    pub location_id: LocationId,
    /// Zone used for current-hour matching and labels.
    pub zone: Tz,
    pub locale: Locale,
    /// Upper bound on a single store query.
    pub fetch_timeout: Duration,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            location_id: LocationId::default(),
            zone: chrono_tz::Asia::Bangkok,
            locale: Locale::default(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Result of an hourly cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub fetched_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub current: Option<ObservationRecord>,
    pub series: Vec<DisplaySeriesPoint>,
}

/// Result of a daily cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub fetched_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub current: Option<ObservationRecord>,
    pub series: Vec<DisplaySeriesPoint>,
}

/// Runs forecast cycles against a store.
///
/// Every cycle reads the clock once, plans its window from that reading,
/// issues a single range query and derives both the current record and the
/// display series from the same batch.
#[derive(Clone)]
pub struct ForecastService {
    repository: Arc<dyn ObservationRepository>,
    clock: Arc<dyn Clock>,
    settings: ForecastSettings,
}

impl ForecastService {
    /// Service on the wall clock.
    pub fn new(repository: Arc<dyn ObservationRepository>, settings: ForecastSettings) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock), settings)
    }

    pub fn with_clock(
        repository: Arc<dyn ObservationRepository>,
        clock: Arc<dyn Clock>,
        settings: ForecastSettings,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    pub fn repository(&self) -> Arc<dyn ObservationRepository> {
        Arc::clone(&self.repository)
    }

    /// Fetch the hourly window and build its snapshot part.
    pub async fn refresh_hourly(&self) -> ForecastResult<HourlyForecast> {
        let now = self.clock.now();
        let (window, records) = self.fetch(SeriesKind::Hourly, now).await?;

        let current = match_current_hour(&records, now, self.settings.zone).cloned();
        if current.is_none() {
            warn!(
                "No hourly record matches {} ({} records fetched)",
                now.with_timezone(&self.settings.zone).format("%Y-%m-%d %H:00 %Z"),
                records.len()
            );
        }

        Ok(HourlyForecast {
            fetched_at: now,
            window,
            current,
            series: build_hourly_series(&records, self.settings.zone),
        })
    }

    /// Fetch the daily window and build its snapshot part.
    pub async fn refresh_daily(&self) -> ForecastResult<DailyForecast> {
        let now = self.clock.now();
        let (window, records) = self.fetch(SeriesKind::Daily, now).await?;

        let current = match_current_day(&records, now, self.settings.zone).cloned();
        if current.is_none() {
            warn!("Daily forecast is empty for location {}", self.settings.location_id);
        }

        Ok(DailyForecast {
            fetched_at: now,
            window,
            current,
            series: build_daily_series(&records, self.settings.zone, self.settings.locale),
        })
    }

    async fn fetch(
        &self,
        series: SeriesKind,
        now: DateTime<Utc>,
    ) -> ForecastResult<(TimeWindow, Vec<ObservationRecord>)> {
        let window = window_for(series, now);
        let query = RangeQuery::forecast(series, window, self.settings.location_id);

        let after = self.settings.fetch_timeout;
        match tokio::time::timeout(after, fetch_forecast_records(self.repository.as_ref(), &query))
            .await
        {
            Ok(Ok(records)) => Ok((window, records)),
            Ok(Err(e)) => {
                error!("{} forecast fetch failed: {}", series, e);
                Err(ForecastError::Store(e))
            }
            Err(_) => {
                error!("{} forecast fetch timed out after {:?}", series, after);
                Err(ForecastError::Timeout { series, after })
            }
        }
    }
}
