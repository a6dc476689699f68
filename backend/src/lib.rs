//! # AQI Forecast Engine
//!
//! Air-quality forecast aggregation and classification for a single
//! monitored site.
//!
//! The engine reads forecast records from a store, picks the record that
//! represents the current local hour and day, classifies each index into a
//! severity band and assembles ordered hourly and daily display series.
//! A background scheduler keeps the published snapshot fresh; the optional
//! HTTP server exposes it as JSON and Server-Sent Events.
//!
//! ## Architecture
//!
//! - [`models`]: records, windows, severity bands, display points, clock
//! - [`db`]: store contract, in-memory and PostgreSQL repositories
//! - [`services`]: current-record matching, series building, fetch cycles,
//!   snapshot publication and periodic refresh
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use aqi_forecast::db::LocalRepository;
//! use aqi_forecast::services::{snapshot_channel, ForecastService, ForecastSettings, RefreshScheduler};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let repo = Arc::new(LocalRepository::new());
//! let service = ForecastService::new(repo, ForecastSettings::default());
//! let (publisher, reader) = snapshot_channel();
//!
//! let handle = RefreshScheduler::new(service, publisher).start();
//! // ... serve `reader.current()` ...
//! handle.shutdown().await;
//! # let _ = reader;
//! # }
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
