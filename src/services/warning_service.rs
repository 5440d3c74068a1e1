// src/services/warning_service.rs
//
// Startup clean-up warning: movies rated low and not watched for years.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::domain::Movie;
use crate::error::AppResult;
use crate::repositories::MovieRepository;

/// Personal ratings strictly below this qualify
pub const RATING_THRESHOLD: f64 = 6.0;

/// Last viewed strictly more than this many years ago qualifies
pub const YEARS_NOT_VIEWED: u32 = 2;

pub struct WarningService {
    movie_repo: Arc<dyn MovieRepository>,
}

impl WarningService {
    pub fn new(movie_repo: Arc<dyn MovieRepository>) -> Self {
        Self { movie_repo }
    }

    pub fn movies_for_warning(&self) -> AppResult<Vec<Movie>> {
        self.movie_repo
            .find_for_warning(RATING_THRESHOLD, YEARS_NOT_VIEWED)
    }

    pub fn has_warnings(&self) -> AppResult<bool> {
        Ok(!self.movies_for_warning()?.is_empty())
    }

    /// Bullet list of the flagged movies, empty when nothing qualifies
    pub fn build_message(&self) -> AppResult<String> {
        Ok(format_warning(&self.movies_for_warning()?))
    }

    pub fn rating_threshold(&self) -> f64 {
        RATING_THRESHOLD
    }

    pub fn years_not_viewed_threshold(&self) -> u32 {
        YEARS_NOT_VIEWED
    }
}

/// The warning text for an already loaded list of flagged movies
pub fn format_warning(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return String::new();
    }

    let mut message = format!(
        "The following movies have a personal rating below {:.1} and have not been watched in over {} years.\n\n\
         Consider deleting them to free up space:\n\n",
        RATING_THRESHOLD, YEARS_NOT_VIEWED
    );

    for movie in movies {
        message.push_str("• ");
        message.push_str(&movie.name);
        if let Some(rating) = movie.personal_rating {
            // Writing into a String cannot fail
            let _ = write!(message, " (Rating: {:.1})", rating);
        }
        message.push('\n');
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockMovieRepository;
    use mockall::predicate::*;

    fn flagged(name: &str, rating: f64) -> Movie {
        let mut movie = Movie::new(name, 6.0, format!("{}.mp4", name));
        movie.personal_rating = Some(rating);
        movie
    }

    fn service_returning(movies: Vec<Movie>) -> WarningService {
        let mut repo = MockMovieRepository::new();
        repo.expect_find_for_warning()
            .with(eq(RATING_THRESHOLD), eq(YEARS_NOT_VIEWED))
            .returning(move |_, _| Ok(movies.clone()));
        WarningService::new(Arc::new(repo))
    }

    #[test]
    fn test_no_warnings() {
        let service = service_returning(Vec::new());

        assert!(!service.has_warnings().unwrap());
        assert_eq!(service.build_message().unwrap(), "");
    }

    #[test]
    fn test_message_lists_each_movie() {
        let service = service_returning(vec![flagged("Cats", 2.0), flagged("Gigli", 5.0)]);

        assert!(service.has_warnings().unwrap());
        assert_eq!(
            service.build_message().unwrap(),
            "The following movies have a personal rating below 6.0 and have not been watched in over 2 years.\n\n\
             Consider deleting them to free up space:\n\n\
             • Cats (Rating: 2.0)\n\
             • Gigli (Rating: 5.0)\n"
        );
    }

    #[test]
    fn test_thresholds() {
        let service = service_returning(Vec::new());

        assert_eq!(service.rating_threshold(), 6.0);
        assert_eq!(service.years_not_viewed_threshold(), 2);
    }

    #[test]
    fn test_store_errors_propagate() {
        let mut repo = MockMovieRepository::new();
        repo.expect_find_for_warning()
            .returning(|_, _| Err(crate::error::AppError::Pool("offline".to_string())));
        let service = WarningService::new(Arc::new(repo));

        assert!(service.has_warnings().is_err());
    }
}
