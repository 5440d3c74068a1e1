// src/application/state.rs

use std::sync::Arc;

use crate::application::cache::CatalogCache;
use crate::db::ConnectionPool;
use crate::events::{create_event_bus, EventBus};
use crate::integrations::{MediaLauncher, SystemLauncher};
use crate::repositories::{SqliteCategoryRepository, SqliteMovieRepository};
use crate::services::{CategoryService, MovieService, PlaybackService, WarningService};

/// Application state shared by all commands.
/// All fields are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub cache: Arc<CatalogCache>,
    pub movie_service: Arc<MovieService>,
    pub category_service: Arc<CategoryService>,
    pub warning_service: Arc<WarningService>,
    pub playback_service: Arc<PlaybackService>,
}

impl AppState {
    /// Wire stores, services and the read cache over one pool,
    /// launching movies with the OS default handler
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self::with_launcher(pool, Arc::new(SystemLauncher::new()))
    }

    pub fn with_launcher(pool: Arc<ConnectionPool>, launcher: Arc<dyn MediaLauncher>) -> Self {
        let event_bus = Arc::new(create_event_bus());

        let movie_repo = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let category_repo = Arc::new(SqliteCategoryRepository::new(pool.clone()));

        let cache = Arc::new(CatalogCache::new());
        cache.subscribe_to(&event_bus);

        Self {
            movie_service: Arc::new(MovieService::new(movie_repo.clone(), event_bus.clone())),
            category_service: Arc::new(CategoryService::new(category_repo, event_bus.clone())),
            warning_service: Arc::new(WarningService::new(movie_repo.clone())),
            playback_service: Arc::new(PlaybackService::new(
                movie_repo,
                launcher,
                event_bus.clone(),
            )),
            pool,
            event_bus,
            cache,
        }
    }
}
