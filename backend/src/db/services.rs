//! Thin service functions over any [`ObservationRepository`].

use log::{debug, warn};

use super::repository::{ObservationRepository, RangeQuery, RepositoryResult};
use crate::models::ObservationRecord;

/// Check whether the store is reachable.
pub async fn health_check(repo: &dyn ObservationRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Run a range query and enforce the query contract on the result.
///
/// Records outside the query's filters are dropped with a warning so a
/// misbehaving store cannot leak another site's data into the series.
/// Ordering is left exactly as the store returned it.
pub async fn fetch_forecast_records(
    repo: &dyn ObservationRepository,
    query: &RangeQuery,
) -> RepositoryResult<Vec<ObservationRecord>> {
    debug!(
        "Fetching {} records for location {} in [{}, {}]",
        query.series,
        query.location_id,
        query.window.start(),
        query.window.end()
    );

    let records = repo
        .fetch_range(query)
        .await
        .map_err(|e| e.or_operation("fetch_forecast_records"))?;

    let fetched = records.len();
    let records: Vec<ObservationRecord> = records
        .into_iter()
        .filter(|record| query.matches(record))
        .collect();

    if records.len() != fetched {
        warn!(
            "Store returned {} {} records outside the query filters; dropped",
            fetched - records.len(),
            query.series
        );
    }
    if records.windows(2).any(|w| w[0].timestamp > w[1].timestamp) {
        warn!("Store returned {} records out of timestamp order", query.series);
    }

    debug!("Fetched {} {} records", records.len(), query.series);
    Ok(records)
}
