// src/application/cache.rs
//
// Read cache of the full catalogue ("all movies", "all categories").
//
// Filled on first read, dropped whenever a mutation event arrives and
// reloaded on the next read. No incremental sync.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{Category, Movie};
use crate::error::AppResult;
use crate::events::{
    CategoryCreated, CategoryDeleted, CategoryUpdated, DomainEvent, EventBus, MovieCreated,
    MovieDeleted, MoviePlayed, MovieUpdated,
};

#[derive(Default)]
pub struct CatalogCache {
    movies: RwLock<Option<Vec<Movie>>>,
    categories: RwLock<Option<Vec<Category>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached movies, or the result of `load` (which is then cached)
    pub fn movies_or_load<F>(&self, load: F) -> AppResult<Vec<Movie>>
    where
        F: FnOnce() -> AppResult<Vec<Movie>>,
    {
        read_through(&self.movies, load)
    }

    pub fn categories_or_load<F>(&self, load: F) -> AppResult<Vec<Category>>
    where
        F: FnOnce() -> AppResult<Vec<Category>>,
    {
        read_through(&self.categories, load)
    }

    pub fn invalidate_movies(&self) {
        *self.movies.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn invalidate_categories(&self) {
        *self.categories.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn invalidate_all(&self) {
        self.invalidate_movies();
        self.invalidate_categories();
    }

    pub fn has_movies(&self) -> bool {
        self.movies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn has_categories(&self) -> bool {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Invalidate on every mutation event.
    /// Category renames and deletions also drop movies, which embed
    /// category names.
    pub fn subscribe_to(self: &Arc<Self>, bus: &EventBus) {
        self.on::<MovieCreated>(bus, Self::invalidate_movies);
        self.on::<MovieUpdated>(bus, Self::invalidate_movies);
        self.on::<MovieDeleted>(bus, Self::invalidate_movies);
        self.on::<MoviePlayed>(bus, Self::invalidate_movies);
        self.on::<CategoryCreated>(bus, Self::invalidate_categories);
        self.on::<CategoryUpdated>(bus, Self::invalidate_all);
        self.on::<CategoryDeleted>(bus, Self::invalidate_all);
    }

    // Holds a weak reference so the bus does not keep the cache alive
    fn on<E: DomainEvent + 'static>(self: &Arc<Self>, bus: &EventBus, action: fn(&CatalogCache)) {
        let cache = Arc::downgrade(self);
        bus.subscribe::<E, _>(move |event| {
            if let Some(cache) = cache.upgrade() {
                log::debug!("{} invalidates catalogue cache", event.event_type());
                action(cache.as_ref());
            }
        });
    }
}

fn read_through<T, F>(slot: &RwLock<Option<Vec<T>>>, load: F) -> AppResult<Vec<T>>
where
    T: Clone,
    F: FnOnce() -> AppResult<Vec<T>>,
{
    if let Some(cached) = slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
        return Ok(cached.clone());
    }

    let loaded = load()?;
    *slot.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
    Ok(loaded)
}
