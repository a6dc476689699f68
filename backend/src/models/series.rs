//! Display-ready series points handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::severity::SeverityBand;

/// Divisor applied to the model PM2.5 value for the daily view.
///
/// Carried over unchanged from the deployed site; its unit derivation is
/// undocumented.
pub const DAILY_POLLUTANT_DIVISOR: f64 = 2.0;

/// Value shown for a daily point whose model PM2.5 is absent.
pub const MISSING_POLLUTANT_SENTINEL: f64 = -1.0;

/// Pollutant value attached to a series point.
///
/// On the wire `Value(v)` is `v`, `Missing` is `-1` and `NotRequested` is
/// `null`. Concentrations are never negative, so the derivations clamp at
/// zero and a `Value` cannot collide with the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DerivedPollutant {
    Value(f64),
    /// Source field was expected but absent.
    Missing,
    /// No pollutant value applies to this point.
    #[default]
    NotRequested,
}

impl DerivedPollutant {
    /// Compatibility view: `Missing` reads as the `-1` sentinel.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DerivedPollutant::Value(v) => Some(*v),
            DerivedPollutant::Missing => Some(MISSING_POLLUTANT_SENTINEL),
            DerivedPollutant::NotRequested => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DerivedPollutant::Missing)
    }

    /// Daily derivation from the raw model value.
    pub fn from_model(model_pollutant: Option<f64>) -> Self {
        match model_pollutant {
            Some(v) => DerivedPollutant::Value(v.max(0.0) / DAILY_POLLUTANT_DIVISOR),
            None => DerivedPollutant::Missing,
        }
    }

    /// Hourly derivation: the observed value is plotted as-is.
    pub fn from_observed(observed_pollutant: Option<f64>) -> Self {
        match observed_pollutant {
            Some(v) => DerivedPollutant::Value(v.max(0.0)),
            None => DerivedPollutant::NotRequested,
        }
    }
}

impl Serialize for DerivedPollutant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_f64() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DerivedPollutant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<f64>::deserialize(deserializer)? {
            None => DerivedPollutant::NotRequested,
            Some(v) if v == MISSING_POLLUTANT_SENTINEL => DerivedPollutant::Missing,
            Some(v) => DerivedPollutant::Value(v),
        })
    }
}

/// One hourly or daily bucket of a display series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySeriesPoint {
    pub label: String,
    pub index: Option<f64>,
    pub derived_pollutant: DerivedPollutant,
    pub band: SeverityBand,
    #[serde(rename = "raw_timestamp")]
    pub timestamp: DateTime<Utc>,
}
