#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;
use std::time::Duration;

use aqi_forecast::db::LocalRepository;
use aqi_forecast::http::{create_router, AppState};
use aqi_forecast::models::{hourly_window, FixedClock, Locale};
use aqi_forecast::services::{
    snapshot_channel, HourlyForecast, RefreshScheduler, SnapshotPublisher,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use support::*;
use tower::ServiceExt;

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Router over a snapshot populated from the seeded store.
async fn populated_app() -> (axum::Router, SnapshotPublisher) {
    let repo = seeded_repository();
    let clock = FixedClock::new(reference_now());
    let service = service(&repo, &clock);
    let (publisher, reader) = snapshot_channel();
    publisher.publish_hourly(service.refresh_hourly().await.unwrap());
    publisher.publish_daily(service.refresh_daily().await.unwrap());

    let app = create_router(AppState::new(Arc::new(repo), reader));
    (app, publisher)
}

fn empty_app() -> (axum::Router, LocalRepository, SnapshotPublisher) {
    let repo = LocalRepository::new();
    let (publisher, reader) = snapshot_channel();
    let app = create_router(AppState::new(Arc::new(repo.clone()), reader));
    (app, repo, publisher)
}

#[tokio::test]
async fn test_health_reports_store_and_snapshot() {
    let (app, repo, _publisher) = empty_app();
    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
    assert_eq!(body["snapshot_ready"], false);

    repo.set_healthy(false);
    let (_, body) = get_json(app, "/health").await;
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_full_snapshot() {
    let (app, _publisher) = populated_app().await;
    let (status, body) = get_json(app, "/v1/forecast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hourly"].as_array().unwrap().len(), 2);
    assert_eq!(body["daily"].as_array().unwrap().len(), 7);
    assert_eq!(body["current_hour"]["detailed_aqi"], 55.0);
    assert_eq!(body["daily"][0]["derived_pollutant"], 25.0);
}

#[tokio::test]
async fn test_current_marks_missing_record_unavailable() {
    let (app, _repo, _publisher) = empty_app();
    let (status, body) = get_json(app, "/v1/forecast/current").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hour"]["available"], false);
    assert!(body["hour"]["record"].is_null());
    assert_eq!(body["hour"]["band"], "unknown");
    assert_eq!(body["day"]["available"], false);
}

#[tokio::test]
async fn test_current_with_data() {
    let (app, _publisher) = populated_app().await;
    let (_, body) = get_json(app, "/v1/forecast/current").await;

    assert_eq!(body["hour"]["available"], true);
    assert_eq!(body["hour"]["band"], "moderate");
    assert_eq!(body["day"]["available"], true);
}

#[tokio::test]
async fn test_series_endpoints() {
    let (app, _publisher) = populated_app().await;

    let (_, hourly) = get_json(app.clone(), "/v1/forecast/hourly").await;
    assert_eq!(hourly["total"], 2);
    assert_eq!(hourly["points"][0]["label"], "14:00");
    assert_eq!(hourly["points"][1]["band"], "unhealthy");

    let (_, daily) = get_json(app, "/v1/forecast/daily").await;
    assert_eq!(daily["total"], 7);
    assert_eq!(daily["points"][0]["label"], "วันนี้");
    assert!(daily["refreshed_at"].is_string());
}

#[tokio::test]
async fn test_bands_legend() {
    let (app, _repo, _publisher) = empty_app();

    let (status, body) = get_json(app.clone(), "/v1/bands?locale=en").await;
    assert_eq!(status, StatusCode::OK);
    let bands = body["bands"].as_array().unwrap();
    assert_eq!(bands.len(), 5);
    assert_eq!(bands[0]["band"], "very_good");
    assert_eq!(bands[0]["aqi_range"], "0-25");
    assert_eq!(bands[4]["label"], "Very unhealthy");

    let (status, _) = get_json(app, "/v1/bands?locale=fr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_classify_endpoint() {
    let (app, _repo, _publisher) = empty_app();

    let (_, body) = get_json(app.clone(), "/v1/classify?index=25").await;
    assert_eq!(body["band"], "very_good");

    let (_, body) = get_json(app.clone(), "/v1/classify?index=25.0001").await;
    assert_eq!(body["band"], "good");

    let (_, body) = get_json(app.clone(), "/v1/classify").await;
    assert_eq!(body["band"], "unknown");
    assert!(body["index"].is_null());

    let (status, body) = get_json(app, "/v1/classify?index=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_default_locale_comes_from_state() {
    let (_publisher, reader) = snapshot_channel();
    let app = create_router(
        AppState::new(Arc::new(LocalRepository::new()), reader).with_locale(Locale::English),
    );

    let (_, body) = get_json(app, "/v1/classify?index=300").await;
    assert_eq!(body["label"], "Very unhealthy");
    assert_eq!(body["level"], 4);
}

#[tokio::test]
async fn test_refresh_without_scheduler_is_unavailable() {
    let (app, _repo, _publisher) = empty_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/forecast/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_refresh_with_scheduler_is_accepted() {
    let repo = seeded_repository();
    let clock = FixedClock::new(reference_now());
    let (publisher, reader) = snapshot_channel();
    let handle = RefreshScheduler::new(service(&repo, &clock), publisher).start();
    let app = create_router(
        AppState::new(Arc::new(repo.clone()), reader).with_refresh(handle.trigger()),
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/forecast/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    handle.shutdown().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/forecast/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_stream_sends_current_snapshot_first() {
    let (app, _publisher) = populated_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/forecast/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.starts_with("event: snapshot\n"));
    assert!(text.contains("\"current_hour\""));
}

#[tokio::test]
async fn test_stream_waits_for_next_publication() {
    let (app, publisher) = populated_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/forecast/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let mut body = response.into_body();
    body.frame().await.unwrap().unwrap();

    let early = tokio::time::timeout(Duration::from_millis(200), body.frame()).await;
    assert!(early.is_err(), "snapshot was sent twice without a publication");

    let now = reference_now() + chrono::TimeDelta::hours(1);
    publisher.publish_hourly(HourlyForecast {
        fetched_at: now,
        window: hourly_window(now),
        current: None,
        series: vec![],
    });

    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.starts_with("event: snapshot\n"));
    assert!(text.contains("\"current_hour\":null"));
}
