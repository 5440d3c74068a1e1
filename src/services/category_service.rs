// src/services/category_service.rs
use crate::domain::{validate_category_name, Category, DomainError};
use crate::error::{AppError, AppResult};
use crate::events::{CategoryCreated, CategoryDeleted, CategoryUpdated, EventBus};
use crate::repositories::CategoryRepository;
use std::sync::Arc;

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    event_bus: Arc<EventBus>,
}

impl CategoryService {
    pub fn new(category_repo: Arc<dyn CategoryRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            category_repo,
            event_bus,
        }
    }

    pub fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.category_repo.list_all()
    }

    pub fn get_category(&self, category_id: i64) -> AppResult<Option<Category>> {
        self.category_repo.get_by_id(category_id)
    }

    pub fn category_exists(&self, name: &str) -> AppResult<bool> {
        self.category_repo.name_exists(name.trim(), None)
    }

    /// Non-empty name, not used by any category other than `exclude_id`.
    /// Uniqueness is checked against the store at call time.
    pub fn validate_category(&self, category: &Category, exclude_id: Option<i64>) -> AppResult<()> {
        let name = category.name.trim();
        validate_category_name(name).map_err(AppError::Domain)?;

        if self.category_repo.name_exists(name, exclude_id)? {
            return Err(AppError::Domain(DomainError::InvariantViolation(
                "A category with this name already exists".to_string(),
            )));
        }
        Ok(())
    }

    pub fn create_category(&self, name: &str) -> AppResult<Category> {
        let category = Category::new(name.trim());
        self.validate_category(&category, None)?;

        let created = self.category_repo.create(&category)?;

        self.event_bus
            .emit(CategoryCreated::new(created.id, created.name.clone()));
        Ok(created)
    }

    /// Rename; the name is trimmed before it is stored
    pub fn update_category(&self, category: &Category) -> AppResult<Category> {
        let renamed = Category::with_id(category.id, category.name.trim());
        self.validate_category(&renamed, Some(renamed.id))?;

        self.category_repo.update(&renamed)?;

        self.event_bus
            .emit(CategoryUpdated::new(renamed.id, renamed.name.clone()));
        Ok(renamed)
    }

    /// Removes the category from every movie; the movies stay
    pub fn delete_category(&self, category_id: i64) -> AppResult<()> {
        self.category_repo.delete(category_id)?;

        self.event_bus.emit(CategoryDeleted::new(category_id));
        Ok(())
    }
}
