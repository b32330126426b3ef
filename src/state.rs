//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::history::HistoryStore;
use crate::source::ListingSource;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Where listings are fetched from.
    pub source: Arc<dyn ListingSource>,

    /// Persistent history of picks.
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn ListingSource>, history: HistoryStore) -> Self {
        Self {
            config: Arc::new(config),
            source,
            history,
        }
    }
}
