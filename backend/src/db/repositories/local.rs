//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`ObservationRepository`]
//! suitable for unit testing and local development. Records are kept per
//! collection in memory and every query applies the full range-query
//! contract, so behaviour matches the production store.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, ObservationRepository, RangeQuery, RepositoryError, RepositoryResult,
};
use crate::models::{ObservationRecord, SeriesKind};

/// In-memory local repository.
///
/// Clones share the same underlying data, so a test can keep a handle to
/// seed records or inject failures while the engine owns another.
///
/// # Example
/// ```
/// use aqi_forecast::db::repositories::LocalRepository;
/// use aqi_forecast::models::{LocationId, ObservationRecord, SeriesKind};
///
/// let repo = LocalRepository::new();
/// let record = ObservationRecord::forecast(LocationId::new(1), chrono::Utc::now()).with_index(42.0);
/// repo.insert(SeriesKind::Hourly, record);
/// assert_eq!(repo.record_count(SeriesKind::Hourly), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    series: HashMap<SeriesKind, Vec<ObservationRecord>>,

    // Connection health
    is_healthy: bool,
    // Number of queries served, including failed ones
    query_count: u64,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            series: HashMap::new(),
            is_healthy: true,
            query_count: 0,
        }
    }
}

/// JSON seed document: `{"hourly": [...], "daily": [...]}` using the store
/// column names for each record.
#[derive(Debug, Default, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    hourly: Vec<ObservationRecord>,
    #[serde(default)]
    daily: Vec<ObservationRecord>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a JSON seed document. Returns the number of records
    /// added.
    pub fn load_json(&self, content: &str) -> RepositoryResult<usize> {
        let seed: SeedDocument = serde_json::from_str(content).map_err(|e| {
            RepositoryError::validation(format!("Invalid seed document: {}", e))
        })?;
        let added = seed.hourly.len() + seed.daily.len();
        self.insert_many(SeriesKind::Hourly, seed.hourly);
        self.insert_many(SeriesKind::Daily, seed.daily);
        Ok(added)
    }

    /// Load records from a JSON seed file.
    pub fn load_seed_file(&self, path: impl AsRef<Path>) -> RepositoryResult<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let added = self.load_json(&content)?;
        log::info!("Loaded {} records from {}", added, path.display());
        Ok(added)
    }

    /// Add a record to a collection.
    pub fn insert(&self, series: SeriesKind, record: ObservationRecord) {
        self.data
            .write()
            .series
            .entry(series)
            .or_default()
            .push(record);
    }

    /// Add several records to a collection.
    pub fn insert_many(
        &self,
        series: SeriesKind,
        records: impl IntoIterator<Item = ObservationRecord>,
    ) {
        self.data
            .write()
            .series
            .entry(series)
            .or_default()
            .extend(records);
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every query fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all records, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.series.clear();
        data.query_count = 0;
    }

    /// Get the number of records stored in a collection.
    pub fn record_count(&self, series: SeriesKind) -> usize {
        self.data
            .read()
            .series
            .get(&series)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Number of range queries received so far.
    pub fn query_count(&self) -> u64 {
        self.data.read().query_count
    }
}

#[async_trait]
impl ObservationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_range(&self, query: &RangeQuery) -> RepositoryResult<Vec<ObservationRecord>> {
        let mut data = self.data.write();
        data.query_count += 1;

        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new("fetch_range")
                    .with_entity(query.series.default_table())
                    .with_entity_id(query.location_id),
            ));
        }

        let mut records: Vec<ObservationRecord> = data
            .series
            .get(&query.series)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|record| query.matches(record))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Stable sort keeps insertion order among equal timestamps
        records.sort_by_key(|record| record.timestamp);
        Ok(records)
    }
}
