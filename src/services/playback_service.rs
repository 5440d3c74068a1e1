// src/services/playback_service.rs
//
// Play = launch the external player, then record the view.
// A failed launch leaves last_view untouched.

use std::path::Path;
use std::sync::Arc;

use crate::domain::Movie;
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MoviePlayed};
use crate::integrations::MediaLauncher;
use crate::repositories::MovieRepository;

pub struct PlaybackService {
    movie_repo: Arc<dyn MovieRepository>,
    launcher: Arc<dyn MediaLauncher>,
    event_bus: Arc<EventBus>,
}

impl PlaybackService {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        launcher: Arc<dyn MediaLauncher>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            movie_repo,
            launcher,
            event_bus,
        }
    }

    /// Returns the movie with its new last_view
    pub fn play_movie(&self, movie_id: i64) -> AppResult<Movie> {
        let mut movie = self
            .movie_repo
            .get_by_id(movie_id)?
            .ok_or(AppError::NotFound)?;

        self.launcher.open(Path::new(&movie.file_link))?;

        let viewed_at = self.movie_repo.update_last_viewed(movie.id)?;
        movie.last_view = Some(viewed_at);

        self.event_bus
            .emit(MoviePlayed::new(movie.id, movie.file_link.clone(), viewed_at));
        Ok(movie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::MockMediaLauncher;
    use crate::repositories::MockMovieRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn stored(id: i64) -> Movie {
        let mut movie = Movie::new("Vertigo", 8.3, "/films/vertigo.mp4");
        movie.id = id;
        movie
    }

    #[test]
    fn test_play_launches_then_records_view() {
        let viewed_at = Utc::now();
        let mut repo = MockMovieRepository::new();
        repo.expect_get_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(stored(id))));
        repo.expect_update_last_viewed()
            .with(eq(4))
            .times(1)
            .returning(move |_| Ok(viewed_at));

        let mut launcher = MockMediaLauncher::new();
        launcher
            .expect_open()
            .withf(|path| path == Path::new("/films/vertigo.mp4"))
            .times(1)
            .returning(|_| Ok(()));

        let bus = Arc::new(EventBus::new());
        let service = PlaybackService::new(Arc::new(repo), Arc::new(launcher), bus.clone());

        let played = service.play_movie(4).unwrap();

        assert_eq!(played.last_view, Some(viewed_at));
        assert_eq!(bus.get_event_log()[0].event_type, "MoviePlayed");
    }

    #[test]
    fn test_failed_launch_does_not_record_view() {
        let mut repo = MockMovieRepository::new();
        repo.expect_get_by_id().returning(|id| Ok(Some(stored(id))));
        repo.expect_update_last_viewed().never();

        let mut launcher = MockMediaLauncher::new();
        launcher
            .expect_open()
            .returning(|_| Err(AppError::Player("no handler".to_string())));

        let bus = Arc::new(EventBus::new());
        let service = PlaybackService::new(Arc::new(repo), Arc::new(launcher), bus.clone());

        assert!(matches!(service.play_movie(1), Err(AppError::Player(_))));
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_unknown_movie_is_not_found() {
        let mut repo = MockMovieRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let mut launcher = MockMediaLauncher::new();
        launcher.expect_open().never();

        let service =
            PlaybackService::new(Arc::new(repo), Arc::new(launcher), Arc::new(EventBus::new()));

        assert!(matches!(service.play_movie(99), Err(AppError::NotFound)));
    }
}
