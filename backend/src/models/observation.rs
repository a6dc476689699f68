//! Forecast records as delivered by the record store.
//!
//! Records are owned by the external store and are never mutated by the
//! engine. Field names on the wire follow the store columns (`date`,
//! `detailed_aqi`, `model_pm_25`, `pm_25`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id_type!(i64, LocationId);

impl Default for LocationId {
    /// The Chiang Mai monitoring site.
    fn default() -> Self {
        LocationId(1)
    }
}

/// Which store collection a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Hour-resolution forecast collection.
    Hourly,
    /// Day-resolution forecast collection.
    Daily,
}

impl SeriesKind {
    /// Collection name used by the deployed store.
    pub fn default_table(&self) -> &'static str {
        match self {
            SeriesKind::Hourly => "hourly-weather-data",
            SeriesKind::Daily => "weather-data",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Hourly => write!(f, "hourly"),
            SeriesKind::Daily => write!(f, "daily"),
        }
    }
}

impl FromStr for SeriesKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" | "hour" | "hourly-series" => Ok(Self::Hourly),
            "daily" | "day" | "daily-series" => Ok(Self::Daily),
            _ => Err(format!("Unknown series kind: {}", s)),
        }
    }
}

/// A single time-stamped air-quality observation or forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Absolute instant the record describes.
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub location_id: LocationId,
    pub is_forecast: bool,
    /// Computed air-quality index ("detailed AQI").
    #[serde(rename = "detailed_aqi", default)]
    pub index: Option<f64>,
    /// Raw model-estimated PM2.5 concentration.
    #[serde(rename = "model_pm_25", default)]
    pub model_pollutant: Option<f64>,
    /// Directly observed PM2.5 concentration, when available.
    #[serde(rename = "pm_25", default)]
    pub observed_pollutant: Option<f64>,
}

impl ObservationRecord {
    /// Create a forecast record with no measured fields.
    pub fn forecast(location_id: LocationId, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            location_id,
            is_forecast: true,
            index: None,
            model_pollutant: None,
            observed_pollutant: None,
        }
    }

    /// Set the air-quality index.
    pub fn with_index(mut self, index: f64) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the model PM2.5 value.
    pub fn with_model_pollutant(mut self, value: f64) -> Self {
        self.model_pollutant = Some(value);
        self
    }

    /// Set the observed PM2.5 value.
    pub fn with_observed_pollutant(mut self, value: f64) -> Self {
        self.observed_pollutant = Some(value);
        self
    }

    /// Mark the record as a past observation rather than a forecast.
    pub fn observed(mut self) -> Self {
        self.is_forecast = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_location_id_parse() {
        let id: LocationId = " 7 ".parse().unwrap();
        assert_eq!(id, LocationId::new(7));
        assert!("abc".parse::<LocationId>().is_err());
    }

    #[test]
    fn test_location_id_default_is_chiang_mai() {
        assert_eq!(LocationId::default().value(), 1);
    }

    #[test]
    fn test_series_kind_from_str() {
        assert_eq!("Hourly".parse::<SeriesKind>().unwrap(), SeriesKind::Hourly);
        assert_eq!("daily-series".parse::<SeriesKind>().unwrap(), SeriesKind::Daily);
        assert!("weekly".parse::<SeriesKind>().is_err());
    }

    #[test]
    fn test_record_deserializes_store_columns() {
        let json = r#"{
            "date": "2025-01-15T07:00:00Z",
            "location_id": 1,
            "is_forecast": true,
            "detailed_aqi": 87.5,
            "model_pm_25": 50.0
        }"#;

        let record: ObservationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2025, 1, 15, 7, 0, 0).unwrap()
        );
        assert_eq!(record.location_id, LocationId::new(1));
        assert_eq!(record.index, Some(87.5));
        assert_eq!(record.model_pollutant, Some(50.0));
        assert_eq!(record.observed_pollutant, None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 15, 7, 0, 0).unwrap();
        let record = ObservationRecord::forecast(LocationId::new(3), ts)
            .with_index(12.0)
            .with_observed_pollutant(8.0);

        assert!(record.is_forecast);
        assert_eq!(record.index, Some(12.0));
        assert_eq!(record.model_pollutant, None);
        assert_eq!(record.observed_pollutant, Some(8.0));
        assert!(!record.observed().is_forecast);
    }
}
