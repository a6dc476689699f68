//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only public data.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/forecast", get(handlers::get_forecast))
        .route("/forecast/current", get(handlers::get_current))
        .route("/forecast/hourly", get(handlers::get_hourly))
        .route("/forecast/daily", get(handlers::get_daily))
        .route("/forecast/stream", get(handlers::stream_forecast))
        .route("/forecast/refresh", post(handlers::trigger_refresh))
        .route("/bands", get(handlers::get_bands))
        .route("/classify", get(handlers::classify_index));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
