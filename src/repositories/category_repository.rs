// src/repositories/category_repository.rs

use std::sync::Arc;
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::Category;
use crate::error::{AppError, AppResult};

pub trait CategoryRepository: Send + Sync {
    fn list_all(&self) -> AppResult<Vec<Category>>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Category>>;
    fn create(&self, category: &Category) -> AppResult<Category>;
    fn update(&self, category: &Category) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
    /// True when a category other than `exclude_id` already uses `name`
    fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool>;
}

pub struct SqliteCategoryRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCategoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
        Ok(Category {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn list_all(&self) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM category ORDER BY name")?;

        let categories: Vec<Category> = stmt
            .query_map([], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT id, name FROM category WHERE id = ?1")?;

        match stmt.query_row(params![id], Self::row_to_category) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn create(&self, category: &Category) -> AppResult<Category> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO category (name) VALUES (?1)",
            params![category.name],
        )?;

        Ok(Category::with_id(conn.last_insert_rowid(), category.name.clone()))
    }

    fn update(&self, category: &Category) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
            params![category.name, category.id],
        )?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        // cat_movie rows go with it (ON DELETE CASCADE)
        let rows = conn.execute("DELETE FROM category WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE name = ?1 AND (?2 IS NULL OR id <> ?2))",
            params![name, exclude_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }
}
