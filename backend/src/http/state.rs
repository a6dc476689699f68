//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::ObservationRepository;
use crate::models::Locale;
use crate::services::{RefreshTrigger, SnapshotReader};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store used for health reporting
    pub repository: Arc<dyn ObservationRepository>,
    /// Latest published forecast
    pub snapshots: SnapshotReader,
    /// Out-of-band refresh requests; `None` when no scheduler runs
    pub refresh: Option<RefreshTrigger>,
    /// Default language for band labels
    pub locale: Locale,
}

impl AppState {
    pub fn new(repository: Arc<dyn ObservationRepository>, snapshots: SnapshotReader) -> Self {
        Self {
            repository,
            snapshots,
            refresh: None,
            locale: Locale::default(),
        }
    }

    pub fn with_refresh(mut self, trigger: RefreshTrigger) -> Self {
        self.refresh = Some(trigger);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
