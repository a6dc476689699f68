//! Display series assembly.
//!
//! Both builders emit exactly one point per input record in input order;
//! the store is the authority on ordering and distinctness.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::models::{DerivedPollutant, DisplaySeriesPoint, Locale, ObservationRecord, SeverityBand};

/// Format for hourly point labels (local wall-clock time).
pub const HOURLY_LABEL_FORMAT: &str = "%H:%M";

fn point(
    record: &ObservationRecord,
    label: String,
    derived_pollutant: DerivedPollutant,
) -> DisplaySeriesPoint {
    DisplaySeriesPoint {
        label,
        index: record.index,
        derived_pollutant,
        band: SeverityBand::classify(record.index),
        timestamp: record.timestamp,
    }
}

/// Local wall-clock label for an hourly point, e.g. `"14:00"`.
pub fn hourly_label(timestamp: DateTime<Utc>, zone: Tz) -> String {
    timestamp
        .with_timezone(&zone)
        .format(HOURLY_LABEL_FORMAT)
        .to_string()
}

/// Label for the `position`-th entry of a daily series.
///
/// Positions 0 and 1 are always "today" and "tomorrow" whatever the actual
/// weekday of the record.
pub fn daily_label(position: usize, timestamp: DateTime<Utc>, zone: Tz, locale: Locale) -> String {
    match position {
        0 => locale.today().to_string(),
        1 => locale.tomorrow().to_string(),
        _ => locale
            .weekday_name(timestamp.with_timezone(&zone).weekday())
            .to_string(),
    }
}

/// Hourly series: local-time labels, observed pollutant plotted as-is.
pub fn build_hourly_series(records: &[ObservationRecord], zone: Tz) -> Vec<DisplaySeriesPoint> {
    records
        .iter()
        .map(|record| {
            point(
                record,
                hourly_label(record.timestamp, zone),
                DerivedPollutant::from_observed(record.observed_pollutant),
            )
        })
        .collect()
}

/// Daily series: relative-day or weekday labels, model pollutant halved
/// (missing model value reads as `-1`).
pub fn build_daily_series(
    records: &[ObservationRecord],
    zone: Tz,
    locale: Locale,
) -> Vec<DisplaySeriesPoint> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            point(
                record,
                daily_label(position, record.timestamp, zone, locale),
                DerivedPollutant::from_model(record.model_pollutant),
            )
        })
        .collect()
}
