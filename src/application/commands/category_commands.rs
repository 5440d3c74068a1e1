// src/application/commands/category_commands.rs

use crate::application::dto::CategoryDto;
use crate::application::error_handling::ToErrorResponse;
use crate::application::state::AppState;
use crate::domain::Category;

use super::CommandResult;

/// All categories ordered by name, through the catalogue cache
pub fn list_categories(state: &AppState) -> CommandResult<Vec<CategoryDto>> {
    let category_service = &state.category_service;
    let categories = state
        .cache
        .categories_or_load(|| category_service.list_categories())
        .to_error_response()?;

    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

pub fn create_category(state: &AppState, name: &str) -> CommandResult<CategoryDto> {
    let category = state
        .category_service
        .create_category(name)
        .to_error_response()?;
    Ok(CategoryDto::from(category))
}

pub fn rename_category(state: &AppState, category_id: i64, name: &str) -> CommandResult<CategoryDto> {
    let category = state
        .category_service
        .update_category(&Category::with_id(category_id, name))
        .to_error_response()?;
    Ok(CategoryDto::from(category))
}

/// Removes the category from every movie as well
pub fn delete_category(state: &AppState, category_id: i64) -> CommandResult<()> {
    state
        .category_service
        .delete_category(category_id)
        .to_error_response()
}
