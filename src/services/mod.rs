// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod category_service;
pub mod movie_service;
pub mod playback_service;
pub mod warning_service;

pub use category_service::CategoryService;

pub use movie_service::{filter_movies, sort_movies, MovieFilter, MovieService, SortKey};

pub use playback_service::PlaybackService;

pub use warning_service::{WarningService, RATING_THRESHOLD, YEARS_NOT_VIEWED};

// Validation entry points shared with the domain layer
pub use crate::domain::{is_valid_movie_file, validate_movie};
