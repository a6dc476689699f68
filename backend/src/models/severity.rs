//! Air-quality index classification.
//!
//! Bands follow the Thai AQI reference table. Every band's upper bound is
//! inclusive: an index of exactly 25 is still [`SeverityBand::VeryGood`].

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Upper (inclusive) index bound of each classified band, in severity order.
pub const BAND_UPPER_BOUNDS: [f64; 4] = [25.0, 50.0, 100.0, 200.0];

/// Discrete severity bucket for an air-quality index.
///
/// Variants are declared in ascending severity, so the derived `Ord`
/// orders them by severity with `Unknown` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    VeryGood,
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    /// Missing or invalid index.
    Unknown,
}

impl SeverityBand {
    /// Classify an optional index value.
    ///
    /// `None` and `NaN` map to `Unknown`. Negative values fall in `VeryGood`.
    pub fn classify(index: Option<f64>) -> Self {
        match index {
            None => SeverityBand::Unknown,
            Some(v) if v.is_nan() => SeverityBand::Unknown,
            Some(v) if v <= BAND_UPPER_BOUNDS[0] => SeverityBand::VeryGood,
            Some(v) if v <= BAND_UPPER_BOUNDS[1] => SeverityBand::Good,
            Some(v) if v <= BAND_UPPER_BOUNDS[2] => SeverityBand::Moderate,
            Some(v) if v <= BAND_UPPER_BOUNDS[3] => SeverityBand::Unhealthy,
            Some(_) => SeverityBand::VeryUnhealthy,
        }
    }

    /// Ordinal level, 0 for `VeryGood` through 5 for `Unknown`.
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// All classified bands in severity order, excluding `Unknown`.
    pub fn legend() -> [SeverityBand; 5] {
        [
            SeverityBand::VeryGood,
            SeverityBand::Good,
            SeverityBand::Moderate,
            SeverityBand::Unhealthy,
            SeverityBand::VeryUnhealthy,
        ]
    }

    /// Index range covered by the band, as printed in the reference table.
    pub fn aqi_range(&self) -> &'static str {
        match self {
            SeverityBand::VeryGood => "0-25",
            SeverityBand::Good => "26-50",
            SeverityBand::Moderate => "51-100",
            SeverityBand::Unhealthy => "101-200",
            SeverityBand::VeryUnhealthy => ">200",
            SeverityBand::Unknown => "-",
        }
    }

    /// 24-hour average PM2.5 range (µg/m³) matching the band.
    pub fn pm25_range(&self) -> &'static str {
        match self {
            SeverityBand::VeryGood => "0-15.0",
            SeverityBand::Good => "15.1-25.0",
            SeverityBand::Moderate => "25.1-37.5",
            SeverityBand::Unhealthy => "37.6-75.0",
            SeverityBand::VeryUnhealthy => ">75.1",
            SeverityBand::Unknown => "-",
        }
    }

    /// Human-readable band name.
    pub fn label(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Thai, SeverityBand::VeryGood) => "คุณภาพอากาศดีมาก",
            (Locale::Thai, SeverityBand::Good) => "คุณภาพอากาศดี",
            (Locale::Thai, SeverityBand::Moderate) => "คุณภาพอากาศปานกลาง",
            (Locale::Thai, SeverityBand::Unhealthy) => "คุณภาพอากาศมีผลกระทบต่อสุขภาพ",
            (Locale::Thai, SeverityBand::VeryUnhealthy) => "คุณภาพอากาศมีผลกระทบต่อสุขภาพมาก",
            (Locale::Thai, SeverityBand::Unknown) => "ไม่มีข้อมูล",
            (Locale::English, SeverityBand::VeryGood) => "Very good",
            (Locale::English, SeverityBand::Good) => "Good",
            (Locale::English, SeverityBand::Moderate) => "Moderate",
            (Locale::English, SeverityBand::Unhealthy) => "Unhealthy",
            (Locale::English, SeverityBand::VeryUnhealthy) => "Very unhealthy",
            (Locale::English, SeverityBand::Unknown) => "No data",
        }
    }
}

/// Shorthand for [`SeverityBand::classify`].
pub fn classify(index: Option<f64>) -> SeverityBand {
    SeverityBand::classify(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(classify(Some(25.0)), SeverityBand::VeryGood);
        assert_eq!(classify(Some(25.0001)), SeverityBand::Good);
        assert_eq!(classify(Some(50.0)), SeverityBand::Good);
        assert_eq!(classify(Some(50.0001)), SeverityBand::Moderate);
        assert_eq!(classify(Some(100.0)), SeverityBand::Moderate);
        assert_eq!(classify(Some(100.0001)), SeverityBand::Unhealthy);
        assert_eq!(classify(Some(200.0)), SeverityBand::Unhealthy);
        assert_eq!(classify(Some(200.0001)), SeverityBand::VeryUnhealthy);
    }

    #[test]
    fn test_missing_and_invalid_index() {
        assert_eq!(classify(None), SeverityBand::Unknown);
        assert_eq!(classify(Some(f64::NAN)), SeverityBand::Unknown);
    }

    #[test]
    fn test_zero_and_negative_index() {
        assert_eq!(classify(Some(0.0)), SeverityBand::VeryGood);
        assert_eq!(classify(Some(-3.0)), SeverityBand::VeryGood);
        assert_eq!(classify(Some(f64::NEG_INFINITY)), SeverityBand::VeryGood);
        assert_eq!(classify(Some(f64::INFINITY)), SeverityBand::VeryUnhealthy);
    }

    #[test]
    fn test_levels_follow_severity_order() {
        let levels: Vec<u8> = SeverityBand::legend().iter().map(|b| b.level()).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4]);
        assert_eq!(SeverityBand::Unknown.level(), 5);
        assert!(SeverityBand::Good < SeverityBand::Moderate);
        assert!(SeverityBand::VeryUnhealthy < SeverityBand::Unknown);
    }

    #[test]
    fn test_reference_table_ranges() {
        assert_eq!(SeverityBand::Moderate.aqi_range(), "51-100");
        assert_eq!(SeverityBand::Moderate.pm25_range(), "25.1-37.5");
        assert_eq!(SeverityBand::VeryUnhealthy.pm25_range(), ">75.1");
        assert_eq!(SeverityBand::Good.label(Locale::English), "Good");
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&SeverityBand::VeryUnhealthy).unwrap();
        assert_eq!(json, "\"very_unhealthy\"");
    }

    proptest! {
        #[test]
        fn prop_very_good_range(index in 0.0f64..=25.0) {
            prop_assert_eq!(classify(Some(index)), SeverityBand::VeryGood);
        }

        #[test]
        fn prop_good_range(index in 25.0001f64..=50.0) {
            prop_assert_eq!(classify(Some(index)), SeverityBand::Good);
        }

        #[test]
        fn prop_moderate_range(index in 50.0001f64..=100.0) {
            prop_assert_eq!(classify(Some(index)), SeverityBand::Moderate);
        }

        #[test]
        fn prop_unhealthy_range(index in 100.0001f64..=200.0) {
            prop_assert_eq!(classify(Some(index)), SeverityBand::Unhealthy);
        }

        #[test]
        fn prop_very_unhealthy_range(index in 200.0001f64..1.0e9) {
            prop_assert_eq!(classify(Some(index)), SeverityBand::VeryUnhealthy);
        }

        #[test]
        fn prop_classification_is_monotonic(a in -1.0e4f64..1.0e4, b in -1.0e4f64..1.0e4) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(Some(lo)) <= classify(Some(hi)));
        }
    }
}
