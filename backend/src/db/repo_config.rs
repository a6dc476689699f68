//! Store sections of the TOML configuration file.
//!
//! `[repository]` selects the backend, `[postgres]` carries the pool and
//! table settings. Both are embedded in [`crate::config::AppConfig`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::PostgresConfig;
use crate::models::SeriesKind;

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// JSON records loaded into the local repository at startup
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            seed_file: None,
        }
    }
}

impl RepositorySettings {
    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

impl PostgresSettings {
    /// Convert to a `PostgresConfig` reading the given tables.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(
        &self,
        hourly_table: &str,
        daily_table: &str,
    ) -> Result<PostgresConfig, RepositoryError> {
        if self.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires 'postgres.database_url' setting",
            ));
        }

        Ok(PostgresConfig {
            database_url: self.database_url.clone(),
            max_pool_size: self.max_connections,
            min_pool_size: self.min_connections,
            connection_timeout_sec: self.connect_timeout,
            idle_timeout_sec: self.idle_timeout,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
            hourly_table: hourly_table.to_string(),
            daily_table: daily_table.to_string(),
        })
    }

    /// Postgres is unavailable when the feature is disabled.
    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(
        &self,
        _hourly_table: &str,
        _daily_table: &str,
    ) -> Result<PostgresConfig, RepositoryError> {
        Err(RepositoryError::configuration(
            "Postgres repository feature not enabled",
        ))
    }
}

/// Default collection name for a series, as configured in `[forecast]`.
pub fn default_table(series: SeriesKind) -> String {
    series.default_table().to_string()
}
