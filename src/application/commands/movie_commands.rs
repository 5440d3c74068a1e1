// src/application/commands/movie_commands.rs
//
// Movie Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::dto::*;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::domain::{Category, Movie};
use crate::services::{filter_movies, sort_movies, MovieFilter, SortKey};

use super::CommandResult;

/// List the catalogue with the list-view filters and sort applied.
/// Reads through the catalogue cache.
pub fn list_movies(state: &AppState, query: &MovieQueryDto) -> CommandResult<Vec<MovieDto>> {
    let movie_service = &state.movie_service;
    let movies = state
        .cache
        .movies_or_load(|| movie_service.list_all_movies())
        .to_error_response()?;

    let filter = MovieFilter {
        title: query.title.clone(),
        categories: query.categories.clone(),
        min_imdb_rating: query.min_imdb_rating,
    };
    let sort_key = query
        .sort_key
        .as_deref()
        .map(SortKey::from)
        .unwrap_or_default();

    let mut movies = filter_movies(movies, &filter);
    sort_movies(&mut movies, sort_key, query.ascending);

    Ok(movies.into_iter().map(MovieDto::from).collect())
}

/// Name search in the store, bypassing the cache
pub fn search_movies(state: &AppState, query: &str) -> CommandResult<Vec<MovieDto>> {
    let movies = state.movie_service.search_movies(query).to_error_response()?;
    Ok(movies.into_iter().map(MovieDto::from).collect())
}

pub fn get_movie(state: &AppState, movie_id: i64) -> CommandResult<Option<MovieDto>> {
    let movie = state.movie_service.get_movie(movie_id).to_error_response()?;
    Ok(movie.map(MovieDto::from))
}

pub fn create_movie(state: &AppState, dto: SaveMovieDto) -> CommandResult<MovieDto> {
    let categories = resolve_categories(state, &dto.category_ids)?;

    let mut movie = Movie::new(dto.name.trim(), dto.imdb_rating, dto.file_link.trim());
    movie.personal_rating = dto.personal_rating;
    movie.set_categories(categories);

    let created = state.movie_service.create_movie(&movie).to_error_response()?;
    Ok(MovieDto::from(created))
}

/// Overwrite the editable fields of a stored movie. The last view
/// timestamp is kept.
pub fn update_movie(state: &AppState, dto: SaveMovieDto) -> CommandResult<MovieDto> {
    let movie_id = dto
        .id
        .ok_or_else(|| ErrorResponse::validation("Movie id is required for update"))?;

    let mut movie = state
        .movie_service
        .get_movie(movie_id)
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::not_found("Movie"))?;

    movie.name = dto.name.trim().to_string();
    movie.imdb_rating = dto.imdb_rating;
    movie.personal_rating = dto.personal_rating;
    movie.file_link = dto.file_link.trim().to_string();
    movie.set_categories(resolve_categories(state, &dto.category_ids)?);

    state.movie_service.update_movie(&movie).to_error_response()?;
    Ok(MovieDto::from(movie))
}

/// Set (`Some`) or clear (`None`) the personal rating
pub fn rate_movie(state: &AppState, movie_id: i64, rating: Option<f64>) -> CommandResult<()> {
    state
        .movie_service
        .update_personal_rating(movie_id, rating)
        .to_error_response()
}

pub fn delete_movie(state: &AppState, movie_id: i64) -> CommandResult<()> {
    state.movie_service.delete_movie(movie_id).to_error_response()
}

fn resolve_categories(state: &AppState, category_ids: &[i64]) -> CommandResult<Vec<Category>> {
    category_ids
        .iter()
        .map(|&id| {
            state
                .category_service
                .get_category(id)
                .to_error_response()?
                .ok_or_else(|| ErrorResponse::validation(format!("Unknown category id {}", id)))
        })
        .collect()
}
