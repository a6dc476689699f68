//! HTTP handlers for the REST API.
//!
//! Forecast endpoints read the latest published snapshot; only the health
//! check talks to the store.

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use log::warn;

use super::dto::{
    BandInfo, BandsResponse, ClassifyQuery, ClassifyResponse, CurrentEntry, CurrentResponse,
    HealthResponse, LocaleQuery, RefreshResponse, SeriesResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{Locale, SeverityBand};
use crate::services::ForecastSnapshot;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn resolve_locale(requested: Option<&str>, fallback: Locale) -> Result<Locale, AppError> {
    match requested {
        Some(raw) => raw
            .parse::<Locale>()
            .map_err(|e| AppError::bad_input(e, raw)),
        None => Ok(fallback),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports store connectivity and whether a forecast has been published.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let snapshot = state.snapshots.current();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
        snapshot_ready: !snapshot.is_empty(),
        hourly_refreshed_at: snapshot.hourly_refreshed_at,
        daily_refreshed_at: snapshot.daily_refreshed_at,
    }))
}

// =============================================================================
// Forecast Snapshot
// =============================================================================

/// GET /v1/forecast
pub async fn get_forecast(State(state): State<AppState>) -> HandlerResult<ForecastSnapshot> {
    Ok(Json(ForecastSnapshot::clone(&state.snapshots.current())))
}

/// GET /v1/forecast/current
///
/// A missing record is reported as `available: false`, never as an error.
pub async fn get_current(State(state): State<AppState>) -> HandlerResult<CurrentResponse> {
    let snapshot = state.snapshots.current();
    Ok(Json(CurrentResponse {
        hour: CurrentEntry::from(snapshot.current_hour.as_ref()),
        day: CurrentEntry::from(snapshot.current_day.as_ref()),
    }))
}

/// GET /v1/forecast/hourly
pub async fn get_hourly(State(state): State<AppState>) -> HandlerResult<SeriesResponse> {
    let snapshot = state.snapshots.current();
    Ok(Json(SeriesResponse::new(
        snapshot.hourly.clone(),
        snapshot.hourly_refreshed_at,
    )))
}

/// GET /v1/forecast/daily
pub async fn get_daily(State(state): State<AppState>) -> HandlerResult<SeriesResponse> {
    let snapshot = state.snapshots.current();
    Ok(Json(SeriesResponse::new(
        snapshot.daily.clone(),
        snapshot.daily_refreshed_at,
    )))
}

/// GET /v1/forecast/stream
///
/// Server-Sent Events: the current snapshot first, then one `snapshot`
/// event per publication.
pub async fn stream_forecast(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut reader = state.snapshots.clone();
    let stream = async_stream::stream! {
        let mut next = Some(reader.latest());
        while let Some(snapshot) = next {
            match Event::default().event("snapshot").json_data(snapshot.as_ref()) {
                Ok(event) => {
                    yield Ok(event);
                }
                Err(e) => warn!("Failed to encode snapshot event: {}", e),
            }
            next = reader.changed().await;
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// POST /v1/forecast/refresh
///
/// Requests an immediate hourly cycle from the scheduler.
pub async fn trigger_refresh(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RefreshResponse>), AppError> {
    let trigger = state
        .refresh
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Refresh scheduler is not running".into()))?;

    if !trigger.request() {
        return Err(AppError::ServiceUnavailable(
            "Refresh scheduler has been stopped".into(),
        ));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshResponse {
            accepted: true,
            message: "Hourly refresh scheduled".to_string(),
        }),
    ))
}

// =============================================================================
// Classification
// =============================================================================

/// GET /v1/bands
pub async fn get_bands(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> HandlerResult<BandsResponse> {
    let locale = resolve_locale(query.locale.as_deref(), state.locale)?;
    Ok(Json(BandsResponse {
        locale,
        bands: SeverityBand::legend()
            .into_iter()
            .map(|band| BandInfo::new(band, locale))
            .collect(),
    }))
}

/// GET /v1/classify?index=<f64>
///
/// A missing or empty `index` classifies as `unknown`.
pub async fn classify_index(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> HandlerResult<ClassifyResponse> {
    let locale = resolve_locale(query.locale.as_deref(), state.locale)?;
    let index = match query.index.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|e| AppError::bad_input(format!("index must be a number: {}", e), raw))?,
        ),
    };

    Ok(Json(ClassifyResponse {
        index,
        band: BandInfo::new(SeverityBand::classify(index), locale),
    }))
}
