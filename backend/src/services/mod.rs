//! Forecast engine services.
//!
//! - [`current`]: selection of the record that represents "now"
//! - [`series`]: display series assembly
//! - [`forecast`]: one fetch-match-build cycle per series
//! - [`snapshot`]: single-writer publication of the latest results
//! - [`refresh`]: periodic background refresh

pub mod current;
pub mod forecast;
pub mod refresh;
pub mod series;
pub mod snapshot;

pub use current::{match_current_day, match_current_hour};
pub use forecast::{
    DailyForecast, ForecastError, ForecastResult, ForecastService, ForecastSettings,
    HourlyForecast,
};
pub use refresh::{RefreshHandle, RefreshScheduler, RefreshTrigger, SchedulerState};
pub use series::{build_daily_series, build_hourly_series};
pub use snapshot::{snapshot_channel, ForecastSnapshot, SnapshotPublisher, SnapshotReader};
