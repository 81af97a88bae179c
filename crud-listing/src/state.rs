//! Application state management

use std::sync::Arc;

use crate::{
    access::AccessPolicy, config::Config, listing::ListingController, repository::MemoryRepository,
};

/// Application state shared across handlers
///
/// Cloned into every request; all fields are `Arc`s or cheap values.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    repository: Arc<MemoryRepository>,
    access: Arc<AccessPolicy>,
    listing: ListingController,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Create a new AppState with an empty record store
    pub fn new(config: Config) -> Self {
        Self::with_repository(config, Arc::new(MemoryRepository::new()))
    }

    /// Create a new AppState around an existing record store
    pub fn with_repository(config: Config, repository: Arc<MemoryRepository>) -> Self {
        let listing = ListingController::new(config.listing.clone());
        let access = Arc::new(AccessPolicy::new(config.access.default_level));
        Self {
            config: Arc::new(config),
            repository,
            access,
            listing,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &MemoryRepository {
        &self.repository
    }

    pub fn listing(&self) -> &ListingController {
        &self.listing
    }

    /// Per-team access levels
    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }
}
