//! Range-query contract over forecast records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{LocationId, ObservationRecord, SeriesKind, TimeWindow};

/// A single range query against one forecast collection.
///
/// Implementations must return records whose timestamp lies in
/// `[window.start, window.end]` (inclusive on both ends), whose location
/// equals `location_id`, whose forecast flag is set when `forecast_only`
/// is true, sorted ascending by timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeQuery {
    pub series: SeriesKind,
    pub window: TimeWindow,
    pub location_id: LocationId,
    pub forecast_only: bool,
}

impl RangeQuery {
    /// Forecast-only query for a location.
    pub fn forecast(series: SeriesKind, window: TimeWindow, location_id: LocationId) -> Self {
        Self {
            series,
            window,
            location_id,
            forecast_only: true,
        }
    }

    /// Whether a record satisfies the query's filters.
    pub fn matches(&self, record: &ObservationRecord) -> bool {
        record.location_id == self.location_id
            && (!self.forecast_only || record.is_forecast)
            && self.window.contains(record.timestamp)
    }
}

/// Repository trait for forecast record queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Check whether the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the records matching a range query, ascending by timestamp.
    ///
    /// # Returns
    /// * `Ok(Vec<ObservationRecord>)` - Possibly empty, ordered batch
    /// * `Err(RepositoryError)` - If the query fails
    async fn fetch_range(&self, query: &RangeQuery) -> RepositoryResult<Vec<ObservationRecord>>;
}
