//! Shared application state.

use std::sync::Arc;

use cartwright_cart::repository::CartRepository;
use cartwright_core::catalog::ProductCatalog;
use cartwright_core::clock::Clock;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of time for interaction timestamps.
    pub clock: Arc<dyn Clock>,
    /// Cart persistence.
    pub repo: Arc<dyn CartRepository>,
    /// Product price/name resolution.
    pub catalog: Arc<dyn ProductCatalog>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        repo: Arc<dyn CartRepository>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        Self {
            clock,
            repo,
            catalog,
        }
    }
}
