mod support;

use std::io::Write;
use std::time::Duration;

use aqi_forecast::config::AppConfig;
use aqi_forecast::db::{ObservationRepository, RepositoryFactory, RepositoryType};
use aqi_forecast::models::{Locale, LocationId};
use aqi_forecast::services::ForecastError;
use support::with_scoped_env;

const ALL_KEYS: [&str; 12] = [
    "AQI_LOCATION_ID",
    "AQI_TIMEZONE",
    "AQI_LOCALE",
    "AQI_HOURLY_TABLE",
    "AQI_DAILY_TABLE",
    "AQI_REFRESH_SECS",
    "AQI_FETCH_TIMEOUT_SECS",
    "AQI_SEED_FILE",
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "HOST",
    "PORT",
];

fn cleared<'a>(set: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<_> = ALL_KEYS
        .iter()
        .filter(|k| !set.iter().any(|(s, _)| s == *k))
        .map(|k| (*k, None))
        .collect();
    changes.extend_from_slice(set);
    changes
}

#[test]
fn test_env_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[forecast]
location_id = 2
timezone = "Asia/Tokyo"

[server]
port = 9000
"#
    )
    .unwrap();

    let config = with_scoped_env(
        &cleared(&[
            ("AQI_LOCATION_ID", Some("7")),
            ("AQI_LOCALE", Some("en")),
            ("AQI_REFRESH_SECS", Some("900")),
            ("PORT", Some("8181")),
        ]),
        || {
            let mut config = AppConfig::from_file(file.path()).unwrap();
            config.apply_env().unwrap();
            config
        },
    );

    assert_eq!(config.forecast.location_id, LocationId::new(7));
    assert_eq!(config.forecast.timezone, "Asia/Tokyo");
    assert_eq!(config.forecast.locale, Locale::English);
    assert_eq!(config.hourly_interval(), Duration::from_secs(900));
    assert_eq!(config.server.port, 8181);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_env_value_is_configuration_error() {
    let result = with_scoped_env(&cleared(&[("AQI_REFRESH_SECS", Some("hourly"))]), || {
        AppConfig::default().apply_env()
    });

    match result {
        Err(ForecastError::Configuration(msg)) => assert!(msg.contains("AQI_REFRESH_SECS")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_unknown_timezone_from_env_fails_validation() {
    let result = with_scoped_env(&cleared(&[("AQI_TIMEZONE", Some("Nowhere/City"))]), || {
        let mut config = AppConfig::default();
        config.apply_env().unwrap();
        config.validate()
    });
    assert!(matches!(result, Err(ForecastError::Configuration(_))));
}

#[test]
fn test_missing_file_is_configuration_error() {
    let err = AppConfig::from_file("/nonexistent/aqi.toml").unwrap_err();
    assert!(matches!(err, ForecastError::Configuration(_)));
}

#[test]
fn test_repository_type_follows_repository_setting_only() {
    let repo_type = with_scoped_env(
        &cleared(&[("DATABASE_URL", Some("postgres://localhost/aqi"))]),
        || {
            let mut config = AppConfig::default();
            config.apply_env().unwrap();
            config.repository.repository_type().unwrap()
        },
    );
    assert_eq!(repo_type, RepositoryType::Local);

    let repo_type = with_scoped_env(&cleared(&[("REPOSITORY_TYPE", Some("postgres"))]), || {
        let mut config = AppConfig::default();
        config.apply_env().unwrap();
        config.repository.repository_type().unwrap()
    });
    assert_eq!(repo_type, RepositoryType::Postgres);
}

#[tokio::test]
async fn test_local_repository_loads_seed_file() {
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    write!(
        seed,
        r#"{{"daily": [{{"date": "2025-03-09T17:00:00Z", "location_id": 1, "is_forecast": true, "detailed_aqi": 42.0, "model_pm_25": 30.0}}]}}"#
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.repository.seed_file = Some(seed.path().display().to_string());
    let repo = RepositoryFactory::from_app_config(&config).unwrap();

    let now = support::reference_now();
    let query = aqi_forecast::db::RangeQuery::forecast(
        aqi_forecast::models::SeriesKind::Daily,
        aqi_forecast::models::daily_window(now),
        LocationId::new(1),
    );
    let records = repo.fetch_range(&query).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model_pollutant, Some(30.0));
}
