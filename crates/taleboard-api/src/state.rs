//! Shared application state.

use std::sync::{Arc, Mutex};

use taleboard_board::domain::layout::LayoutConfig;
use taleboard_core::rng::RandomSource;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Random source for requests that carry no seed.
    pub rng: Arc<Mutex<dyn RandomSource + Send>>,
    /// Spacing applied to every generated board.
    pub layout: LayoutConfig,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(rng: Arc<Mutex<dyn RandomSource + Send>>, layout: LayoutConfig) -> Self {
        Self { rng, layout }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
