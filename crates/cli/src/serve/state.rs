//! Application state.

use std::sync::Arc;

use decider_storage::DecisionStore;

/// Application state shared across request handlers.
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn DecisionStore>,
}
