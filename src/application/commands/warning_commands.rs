// src/application/commands/warning_commands.rs

use crate::application::dto::{MovieDto, WarningDto};
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::services::warning_service::format_warning;

use super::CommandResult;

pub fn has_movie_warnings(state: &AppState) -> CommandResult<bool> {
    state.warning_service.has_warnings().to_error_response()
}

/// Movies worth deleting, with the message shown at startup
pub fn get_movie_warnings(state: &AppState) -> CommandResult<WarningDto> {
    let warnings = &state.warning_service;

    let movies = warnings.movies_for_warning().to_error_response()?;
    let message = format_warning(&movies);

    Ok(WarningDto {
        rating_threshold: warnings.rating_threshold(),
        years_not_viewed: warnings.years_not_viewed_threshold(),
        movies: movies.into_iter().map(MovieDto::from).collect(),
        message,
    })
}
