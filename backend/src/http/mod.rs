//! HTTP presentation API.
//!
//! Serves the latest published forecast snapshot as JSON. Handlers never
//! query the store for forecast data themselves; they read whatever the
//! refresh scheduler last published.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                   │
//! │  - JSON views of the snapshot                 │
//! │  - SSE stream of publications                 │
//! └───────────────────┬──────────────────────────┘
//!                     │ SnapshotReader
//! ┌───────────────────▼──────────────────────────┐
//! │  RefreshScheduler / ForecastService           │
//! └───────────────────┬──────────────────────────┘
//!                     │ RangeQuery
//! ┌───────────────────▼──────────────────────────┐
//! │  Repository Layer (db/)                       │
//! │  - LocalRepository / PostgresRepository       │
//! └──────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
