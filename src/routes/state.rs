use std::sync::Arc;

use crate::{
    db::DocumentStore,
    services::{
        FeaturedSampler, MovieBuddy, MovieCatalog, RecommendationBackend, SocialService,
        WatchlistService,
    },
};

/// Shared application state
///
/// Clients are built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub featured: Arc<FeaturedSampler>,
    pub buddy: Arc<MovieBuddy>,
    pub watchlists: Arc<WatchlistService>,
    pub social: Arc<SocialService>,
    /// Featured count used when the client does not ask for one
    pub featured_count: usize,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        backend: Arc<dyn RecommendationBackend>,
        store: Arc<dyn DocumentStore>,
        featured_count: usize,
    ) -> Self {
        Self {
            featured: Arc::new(FeaturedSampler::new(catalog.clone())),
            buddy: Arc::new(MovieBuddy::new(backend, catalog.clone())),
            watchlists: Arc::new(WatchlistService::new(store.clone())),
            social: Arc::new(SocialService::new(store)),
            catalog,
            featured_count,
        }
    }
}
