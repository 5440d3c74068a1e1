// src/application/commands/playback_commands.rs

use crate::application::dto::MovieDto;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;

use super::CommandResult;

/// Open the movie in the default player and record the view
pub fn play_movie(state: &AppState, movie_id: i64) -> CommandResult<MovieDto> {
    let movie = state
        .playback_service
        .play_movie(movie_id)
        .to_error_response()?;

    Ok(MovieDto::from(movie))
}
