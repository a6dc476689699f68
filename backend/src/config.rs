//! Application configuration.
//!
//! Settings are read from a TOML file (every field has a default) and then
//! overridden by environment variables:
//!
//! - `AQI_LOCATION_ID`: monitored site (default: 1)
//! - `AQI_TIMEZONE`: IANA zone for local-time matching (default: `Asia/Bangkok`)
//! - `AQI_LOCALE`: `th` or `en` (default: `th`)
//! - `AQI_HOURLY_TABLE` / `AQI_DAILY_TABLE`: store collections
//! - `AQI_REFRESH_SECS`: hourly refresh period (default: 3600)
//! - `AQI_FETCH_TIMEOUT_SECS`: per-query timeout (default: 30)
//! - `REPOSITORY_TYPE`, `DATABASE_URL`: store selection
//! - `AQI_SEED_FILE`: JSON records preloaded into the local store
//! - `HOST`, `PORT`: HTTP bind address

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::db::repo_config::{default_table, PostgresSettings, RepositorySettings};
use crate::models::{Locale, LocationId, SeriesKind};
use crate::services::forecast::{ForecastError, ForecastSettings};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "aqi.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub forecast: ForecastSection,
    #[serde(default)]
    pub refresh: RefreshSection,
    #[serde(default)]
    pub server: ServerSection,
}

/// `[forecast]`: which site, zone and labels the engine works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSection {
    #[serde(default)]
    pub location_id: LocationId,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_hourly_table")]
    pub hourly_table: String,
    #[serde(default = "default_daily_table")]
    pub daily_table: String,
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            location_id: LocationId::default(),
            timezone: default_timezone(),
            locale: Locale::default(),
            hourly_table: default_hourly_table(),
            daily_table: default_daily_table(),
        }
    }
}

/// `[refresh]`: scheduler timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSection {
    #[serde(default = "default_hourly_interval_secs")]
    pub hourly_interval_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            hourly_interval_secs: default_hourly_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// `[server]`: HTTP bind address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Bangkok".to_string()
}

fn default_hourly_table() -> String {
    default_table(SeriesKind::Hourly)
}

fn default_daily_table() -> String {
    default_table(SeriesKind::Daily)
}

fn default_hourly_interval_secs() -> u64 {
    3600
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ForecastError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ForecastError::Configuration(format!("{} is invalid: {}", key, e))),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ForecastError> {
        toml::from_str(content).map_err(|e| {
            ForecastError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ForecastError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ForecastError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Locate `aqi.toml` in the current directory, `backend/`, or the parent
    /// directory.
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the default file if present, apply environment overrides and
    /// validate the result.
    pub fn load() -> Result<Self, ForecastError> {
        let mut config = match Self::find_default_file() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    pub fn apply_env(&mut self) -> Result<(), ForecastError> {
        if let Some(v) = parse_env::<LocationId>("AQI_LOCATION_ID")? {
            self.forecast.location_id = v;
        }
        if let Some(v) = parse_env::<String>("AQI_TIMEZONE")? {
            self.forecast.timezone = v;
        }
        if let Some(v) = parse_env::<Locale>("AQI_LOCALE")? {
            self.forecast.locale = v;
        }
        if let Some(v) = parse_env::<String>("AQI_HOURLY_TABLE")? {
            self.forecast.hourly_table = v;
        }
        if let Some(v) = parse_env::<String>("AQI_DAILY_TABLE")? {
            self.forecast.daily_table = v;
        }
        if let Some(v) = parse_env::<u64>("AQI_REFRESH_SECS")? {
            self.refresh.hourly_interval_secs = v;
        }
        if let Some(v) = parse_env::<u64>("AQI_FETCH_TIMEOUT_SECS")? {
            self.refresh.fetch_timeout_secs = v;
        }
        if let Some(v) = parse_env::<String>("REPOSITORY_TYPE")? {
            self.repository.repo_type = v;
        }
        if let Some(v) = parse_env::<String>("AQI_SEED_FILE")? {
            self.repository.seed_file = Some(v);
        }
        if let Some(v) = parse_env::<String>("DATABASE_URL")? {
            self.postgres.database_url = v;
        }
        if let Some(v) = parse_env::<String>("HOST")? {
            self.server.host = v;
        }
        if let Some(v) = parse_env::<u16>("PORT")? {
            self.server.port = v;
        }
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ForecastError> {
        self.timezone()?;
        self.repository
            .repository_type()
            .map_err(|e| ForecastError::Configuration(e.to_string()))?;
        if self.refresh.hourly_interval_secs == 0 {
            return Err(ForecastError::Configuration(
                "refresh.hourly_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.refresh.fetch_timeout_secs == 0 {
            return Err(ForecastError::Configuration(
                "refresh.fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed local time zone.
    pub fn timezone(&self) -> Result<Tz, ForecastError> {
        self.forecast.timezone.parse::<Tz>().map_err(|e| {
            ForecastError::Configuration(format!(
                "Unknown time zone '{}': {}",
                self.forecast.timezone, e
            ))
        })
    }

    /// Hourly refresh period.
    pub fn hourly_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.hourly_interval_secs)
    }

    /// Engine settings derived from this configuration.
    pub fn forecast_settings(&self) -> Result<ForecastSettings, ForecastError> {
        Ok(ForecastSettings {
            location_id: self.forecast.location_id,
            zone: self.timezone()?,
            locale: self.forecast.locale,
            fetch_timeout: Duration::from_secs(self.refresh.fetch_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.forecast.location_id, LocationId::new(1));
        assert_eq!(config.forecast.timezone, "Asia/Bangkok");
        assert_eq!(config.forecast.hourly_table, "hourly-weather-data");
        assert_eq!(config.forecast.daily_table, "weather-data");
        assert_eq!(config.hourly_interval(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let config = AppConfig::from_toml_str(
            r#"
[repository]
type = "local"

[forecast]
location_id = 4
timezone = "Europe/London"
locale = "english"
daily_table = "daily_forecast"

[refresh]
hourly_interval_secs = 600
fetch_timeout_secs = 5

[server]
port = 9000
"#,
        )
        .unwrap();

        assert_eq!(config.forecast.location_id, LocationId::new(4));
        assert_eq!(config.forecast.locale, Locale::English);
        assert_eq!(config.forecast.hourly_table, "hourly-weather-data");
        assert_eq!(config.forecast.daily_table, "daily_forecast");
        assert_eq!(config.refresh.hourly_interval_secs, 600);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");

        let settings = config.forecast_settings().unwrap();
        assert_eq!(settings.zone, chrono_tz::Europe::London);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let mut config = AppConfig::default();
        config.forecast.timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(
            config.validate(),
            Err(ForecastError::Configuration(_))
        ));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.refresh.hourly_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let err = AppConfig::from_toml_str("[forecast\nlocation_id = ").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
