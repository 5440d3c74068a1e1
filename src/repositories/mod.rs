// src/repositories/mod.rs
//
// Repository layer (the stores)
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only
// - One pooled connection per operation

pub mod category_repository;
pub mod cat_movie_repository;
pub mod movie_repository;

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use cat_movie_repository::{CatMovieRepository, SqliteCatMovieRepository};
pub use movie_repository::{MovieRepository, SqliteMovieRepository};

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
