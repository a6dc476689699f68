use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable, Timestamptz, Double};

use crate::models::{LocationId, ObservationRecord};

/// Row shape shared by the hourly and daily forecast tables.
#[derive(Debug, Clone, QueryableByName)]
pub struct ObservationRow {
    #[diesel(sql_type = Timestamptz)]
    pub date: DateTime<Utc>,
    #[diesel(sql_type = BigInt)]
    pub location_id: i64,
    #[diesel(sql_type = Bool)]
    pub is_forecast: bool,
    #[diesel(sql_type = Nullable<Double>)]
    pub detailed_aqi: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub model_pm_25: Option<f64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub pm_25: Option<f64>,
}

impl From<ObservationRow> for ObservationRecord {
    fn from(row: ObservationRow) -> Self {
        ObservationRecord {
            timestamp: row.date,
            location_id: LocationId::new(row.location_id),
            is_forecast: row.is_forecast,
            index: row.detailed_aqi,
            model_pollutant: row.model_pm_25,
            observed_pollutant: row.pm_25,
        }
    }
}
