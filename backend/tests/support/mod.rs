#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use aqi_forecast::db::LocalRepository;
use aqi_forecast::models::{FixedClock, LocationId, ObservationRecord, SeriesKind};
use aqi_forecast::services::{ForecastService, ForecastSettings};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Asia::Bangkok;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const SITE: LocationId = LocationId(1);

/// Instant of a Bangkok wall-clock time.
pub fn bangkok(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Bangkok
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Monday 2025-03-10 14:03 in Bangkok.
pub fn reference_now() -> DateTime<Utc> {
    bangkok(2025, 3, 10, 14, 3)
}

pub fn hourly_record(timestamp: DateTime<Utc>, index: f64) -> ObservationRecord {
    ObservationRecord::forecast(SITE, timestamp)
        .with_index(index)
        .with_observed_pollutant(index / 2.0)
}

pub fn daily_record(timestamp: DateTime<Utc>, index: f64, model: f64) -> ObservationRecord {
    ObservationRecord::forecast(SITE, timestamp)
        .with_index(index)
        .with_model_pollutant(model)
}

/// Repository holding hourly records at 13:00, 14:00 and 15:00 local and a
/// week of daily records from local midnight.
pub fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.insert_many(
        SeriesKind::Hourly,
        vec![
            hourly_record(bangkok(2025, 3, 10, 13, 0), 20.0),
            hourly_record(bangkok(2025, 3, 10, 14, 0), 55.0),
            hourly_record(bangkok(2025, 3, 10, 15, 0), 120.0),
        ],
    );
    let midnight = bangkok(2025, 3, 10, 0, 0);
    repo.insert_many(
        SeriesKind::Daily,
        (0..7).map(|d| daily_record(midnight + TimeDelta::days(d), 30.0 + d as f64, 50.0)),
    );
    repo
}

/// Service over `repo` reading `clock`.
pub fn service(repo: &LocalRepository, clock: &FixedClock) -> ForecastService {
    ForecastService::with_clock(
        Arc::new(repo.clone()),
        Arc::new(clock.clone()),
        ForecastSettings::default(),
    )
}

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
