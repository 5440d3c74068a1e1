// src/lib.rs
// Movie Collection - private movie catalogue
//
// Architecture:
// - Domain-centric: entities and their invariants live in domain/
// - Stores are dumb data mappers over SQLite (repositories/)
// - Services validate, filter/sort and emit events
// - Application layer: DTOs, commands and the catalogue read cache

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    is_valid_movie_file, validate_category_name, validate_movie, validate_personal_rating,
    Category, DomainError, Movie, ALLOWED_EXTENSIONS,
};

// ============================================================================
// PUBLIC API - Errors and Configuration
// ============================================================================

pub use config::{DatabaseSettings, LoggingSettings, Settings};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, CategoryCreated, CategoryDeleted, CategoryUpdated, DomainEvent, EventBus,
    EventLogEntry, MovieCreated, MovieDeleted, MoviePlayed, MovieUpdated,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    bootstrap_database, create_connection_pool, initialize_database, seed_default_data,
    ConnectionPool,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CatMovieRepository, CategoryRepository, MovieRepository, SqliteCatMovieRepository,
    SqliteCategoryRepository, SqliteMovieRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    filter_movies, sort_movies, CategoryService, MovieFilter, MovieService, PlaybackService,
    SortKey, WarningService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, CatalogCache, ErrorResponse};

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{MediaLauncher, SystemLauncher};
