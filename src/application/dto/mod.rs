// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are client-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only; commands build entities

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Movie};

// ============================================================================
// CATEGORY DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: i64,
    pub name: String,
    pub imdb_rating: f64,
    pub personal_rating: Option<f64>,
    /// "Not rated" or one decimal
    pub personal_rating_display: String,
    pub file_link: String,
    /// RFC 3339, absent if never played
    pub last_view: Option<String>,
    pub categories: Vec<CategoryDto>,
    /// "No categories" or the comma-joined names
    pub categories_display: String,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        let personal_rating_display = movie.personal_rating_display();
        let categories_display = movie.categories_display();

        Self {
            id: movie.id,
            name: movie.name,
            imdb_rating: movie.imdb_rating,
            personal_rating: movie.personal_rating,
            personal_rating_display,
            file_link: movie.file_link,
            last_view: movie
                .last_view
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            categories: movie.categories.into_iter().map(CategoryDto::from).collect(),
            categories_display,
        }
    }
}

/// Input of the movie form. `id` is absent on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveMovieDto {
    pub id: Option<i64>,
    pub name: String,
    pub imdb_rating: f64,
    pub personal_rating: Option<f64>,
    pub file_link: String,
    pub category_ids: Vec<i64>,
}

/// List view controls: filters, sort key and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieQueryDto {
    pub title: Option<String>,
    pub categories: Vec<String>,
    pub min_imdb_rating: Option<f64>,
    /// title | imdb | personal | category; anything else sorts by title
    pub sort_key: Option<String>,
    pub ascending: bool,
}

impl Default for MovieQueryDto {
    fn default() -> Self {
        Self {
            title: None,
            categories: Vec::new(),
            min_imdb_rating: None,
            sort_key: None,
            ascending: true,
        }
    }
}

// ============================================================================
// WARNING DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningDto {
    pub rating_threshold: f64,
    pub years_not_viewed: u32,
    pub movies: Vec<MovieDto>,
    /// Empty when nothing qualifies
    pub message: String,
}
