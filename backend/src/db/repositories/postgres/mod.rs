//! Postgres repository implementation using Diesel.
//!
//! Reads the hourly and daily forecast tables written by the upstream
//! forecasting pipeline. The tables are owned by that pipeline, so no
//! migrations run from here.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health check
//!
//! ## Configuration
//!
//! Built from the `[postgres]` section of the application config; see
//! [`crate::config`] for the environment overrides.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Bool, Timestamptz};
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, ObservationRepository, RangeQuery, RepositoryError, RepositoryResult,
};
use crate::models::{ObservationRecord, SeriesKind};

mod models;

use models::ObservationRow;

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Table names may contain `-`, so they are always quoted; anything beyond
/// `[A-Za-z0-9_-]` is rejected before it reaches SQL.
pub fn validate_table_name(name: &str) -> RepositoryResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::configuration(format!(
            "Invalid table name '{}'",
            name
        )))
    }
}

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
    /// Hourly forecast table
    pub hourly_table: String,
    /// Daily forecast table
    pub daily_table: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
            hourly_table: SeriesKind::Hourly.default_table().to_string(),
            daily_table: SeriesKind::Daily.default_table().to_string(),
        }
    }
}

impl PostgresConfig {
    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Table backing a series.
    pub fn table_for(&self, series: SeriesKind) -> &str {
        match series {
            SeriesKind::Hourly => &self.hourly_table,
            SeriesKind::Daily => &self.daily_table,
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository with a connection pool.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the table names are invalid or the pool cannot be built
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        validate_table_name(&config.hourly_table)?;
        validate_table_name(&config.daily_table)?;

        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        Ok(Self { pool, config })
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// This method will retry the operation up to `max_retries` times if a
    /// retryable error occurs (connection errors, timeouts, serialization failures).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

/// Range query SQL for one table.
fn range_query_sql(table: &str) -> String {
    format!(
        "SELECT date, location_id::int8 AS location_id, is_forecast, \
         detailed_aqi::float8 AS detailed_aqi, model_pm_25::float8 AS model_pm_25, \
         pm_25::float8 AS pm_25 \
         FROM \"{}\" \
         WHERE date >= $1 AND date <= $2 AND location_id = $3 \
         AND ($4 = FALSE OR is_forecast = TRUE) \
         ORDER BY date ASC",
        table
    )
}

#[async_trait]
impl ObservationRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn fetch_range(&self, query: &RangeQuery) -> RepositoryResult<Vec<ObservationRecord>> {
        let table = self.config.table_for(query.series).to_string();
        let sql = range_query_sql(&table);
        let query = *query;

        self.with_conn(move |conn| {
            sql_query(sql)
                .bind::<Timestamptz, _>(query.window.start())
                .bind::<Timestamptz, _>(query.window.end())
                .bind::<BigInt, _>(query.location_id.value())
                .bind::<Bool, _>(query.forecast_only)
                .load::<ObservationRow>(conn)
                .map(|rows| rows.into_iter().map(ObservationRecord::from).collect())
                .map_err(|e| {
                    RepositoryError::from(e)
                        .with_operation("fetch_range")
                        .with_entity(table)
                })
        })
        .await
    }
}
