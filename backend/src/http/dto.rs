//! Data Transfer Objects for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DisplaySeriesPoint, Locale, ObservationRecord, SeverityBand};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Store connection status
    pub database: String,
    /// Whether any forecast has been published yet
    pub snapshot_ready: bool,
    pub hourly_refreshed_at: Option<DateTime<Utc>>,
    pub daily_refreshed_at: Option<DateTime<Utc>>,
}

/// The record for "now", or an explicit unavailable marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentEntry {
    pub available: bool,
    pub record: Option<ObservationRecord>,
    pub band: SeverityBand,
}

impl From<Option<&ObservationRecord>> for CurrentEntry {
    fn from(record: Option<&ObservationRecord>) -> Self {
        Self {
            available: record.is_some(),
            band: SeverityBand::classify(record.and_then(|r| r.index)),
            record: record.cloned(),
        }
    }
}

/// Current hour and current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub hour: CurrentEntry,
    pub day: CurrentEntry,
}

/// One display series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub points: Vec<DisplaySeriesPoint>,
    pub total: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl SeriesResponse {
    pub fn new(points: Vec<DisplaySeriesPoint>, refreshed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            total: points.len(),
            points,
            refreshed_at,
        }
    }
}

/// Optional `?locale=` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

/// One row of the band legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandInfo {
    pub band: SeverityBand,
    pub level: u8,
    pub label: String,
    pub aqi_range: String,
    pub pm25_range: String,
}

impl BandInfo {
    pub fn new(band: SeverityBand, locale: Locale) -> Self {
        Self {
            band,
            level: band.level(),
            label: band.label(locale).to_string(),
            aqi_range: band.aqi_range().to_string(),
            pm25_range: band.pm25_range().to_string(),
        }
    }
}

/// Legend table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsResponse {
    pub locale: Locale,
    pub bands: Vec<BandInfo>,
}

/// `GET /v1/classify` query.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyQuery {
    /// Raw text so that a missing or non-numeric value can be reported
    pub index: Option<String>,
    pub locale: Option<String>,
}

/// Classification of a single index value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub index: Option<f64>,
    #[serde(flatten)]
    pub band: BandInfo,
}

/// Response to a manual refresh request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub accepted: bool,
    pub message: String,
}
