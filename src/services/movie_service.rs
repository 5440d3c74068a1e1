// src/services/movie_service.rs
//
// Movie orchestration: validation before every write, events after it,
// and the in-memory filter/sort pipeline used by list views.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{validate_movie, validate_personal_rating, Movie};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MovieCreated, MovieDeleted, MovieUpdated};
use crate::repositories::MovieRepository;

// ============================================================================
// FILTER / SORT
// ============================================================================

/// Optional predicates for `filter_movies`. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieFilter {
    /// Case-insensitive substring of the name
    pub title: Option<String>,
    /// Keep movies carrying at least one of these category names
    pub categories: Vec<String>,
    /// Inclusive lower bound on the IMDB rating
    pub min_imdb_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Title,
    ImdbRating,
    PersonalRating,
    Categories,
}

/// Unknown keys fall back to `Title`
impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "imdb" | "imdb_rating" | "rating" => SortKey::ImdbRating,
            "personal" | "personal_rating" => SortKey::PersonalRating,
            "category" | "categories" => SortKey::Categories,
            _ => SortKey::Title,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            SortKey::Title => "title",
            SortKey::ImdbRating => "imdb",
            SortKey::PersonalRating => "personal",
            SortKey::Categories => "category",
        };
        write!(f, "{}", key)
    }
}

/// Keep the movies passing every supplied predicate, in input order
pub fn filter_movies(movies: Vec<Movie>, filter: &MovieFilter) -> Vec<Movie> {
    let title = filter
        .title
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    movies
        .into_iter()
        .filter(|movie| {
            if let Some(title) = &title {
                if !movie.name.to_lowercase().contains(title.as_str()) {
                    return false;
                }
            }

            if !filter.categories.is_empty()
                && !filter.categories.iter().any(|name| movie.has_category(name))
            {
                return false;
            }

            match filter.min_imdb_rating {
                Some(min) => movie.imdb_rating >= min,
                None => true,
            }
        })
        .collect()
}

/// Stable sort. Descending reverses the whole comparator, so movies
/// without a personal rating come last ascending and first descending.
pub fn sort_movies(movies: &mut [Movie], key: SortKey, ascending: bool) {
    movies.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

fn compare_by(a: &Movie, b: &Movie, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => cmp_ignore_case(&a.name, &b.name),
        SortKey::ImdbRating => a.imdb_rating.total_cmp(&b.imdb_rating),
        SortKey::PersonalRating => match (a.personal_rating, b.personal_rating) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        // Untagged movies sort under their "No categories" label
        SortKey::Categories => cmp_ignore_case(&a.categories_display(), &b.categories_display()),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct MovieService {
    movie_repo: Arc<dyn MovieRepository>,
    event_bus: Arc<EventBus>,
}

impl MovieService {
    pub fn new(movie_repo: Arc<dyn MovieRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            movie_repo,
            event_bus,
        }
    }

    pub fn list_all_movies(&self) -> AppResult<Vec<Movie>> {
        self.movie_repo.list_all()
    }

    pub fn get_movie(&self, movie_id: i64) -> AppResult<Option<Movie>> {
        self.movie_repo.get_by_id(movie_id)
    }

    pub fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.movie_repo.search(query)
    }

    /// Load, filter and sort in one call
    pub fn query_movies(
        &self,
        filter: &MovieFilter,
        sort_key: SortKey,
        ascending: bool,
    ) -> AppResult<Vec<Movie>> {
        let mut movies = filter_movies(self.movie_repo.list_all()?, filter);
        sort_movies(&mut movies, sort_key, ascending);
        Ok(movies)
    }

    pub fn create_movie(&self, movie: &Movie) -> AppResult<Movie> {
        validate_movie(movie).map_err(AppError::Domain)?;

        let created = self.movie_repo.create(movie)?;
        log::debug!("Created movie {} ({})", created.id, created.name);

        self.event_bus
            .emit(MovieCreated::new(created.id, created.name.clone()));
        Ok(created)
    }

    pub fn update_movie(&self, movie: &Movie) -> AppResult<()> {
        validate_movie(movie).map_err(AppError::Domain)?;

        self.movie_repo.update(movie)?;

        self.event_bus.emit(MovieUpdated::new(movie.id));
        Ok(())
    }

    /// Set or clear the personal rating without touching other fields
    pub fn update_personal_rating(&self, movie_id: i64, rating: Option<f64>) -> AppResult<()> {
        validate_personal_rating(rating).map_err(AppError::Domain)?;

        self.movie_repo.update_personal_rating(movie_id, rating)?;

        self.event_bus.emit(MovieUpdated::new(movie_id));
        Ok(())
    }

    pub fn delete_movie(&self, movie_id: i64) -> AppResult<()> {
        self.movie_repo.delete(movie_id)?;

        self.event_bus.emit(MovieDeleted::new(movie_id));
        Ok(())
    }
}
