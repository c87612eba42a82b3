//! Application state for the web layer.

use std::sync::Arc;

use crate::notify::NoticeBoard;
use crate::repository::Backend;
use crate::store::StationStore;

/// The store the console serves from.
pub type ConsoleStore = StationStore<Backend, NoticeBoard>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached station collection, writes and pending notices
    pub store: Arc<ConsoleStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: ConsoleStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
