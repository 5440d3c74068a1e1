// src/repositories/cat_movie_repository.rs
//
// The movie <-> category association (cat_movie rows).
// The relation is a set: inserting an existing pair is a no-op.

use std::sync::Arc;
use rusqlite::{params, Connection};

use crate::db::ConnectionPool;
use crate::domain::Category;
use crate::error::AppResult;

use super::category_repository::SqliteCategoryRepository;

pub trait CatMovieRepository: Send + Sync {
    /// Categories attached to a movie, ordered by name
    fn categories_for_movie(&self, movie_id: i64) -> AppResult<Vec<Category>>;
    fn movie_ids_for_category(&self, category_id: i64) -> AppResult<Vec<i64>>;
    fn add_category_to_movie(&self, movie_id: i64, category_id: i64) -> AppResult<()>;
    fn remove_category_from_movie(&self, movie_id: i64, category_id: i64) -> AppResult<()>;
    /// Returns how many associations were removed
    fn remove_categories_from_movie(&self, movie_id: i64) -> AppResult<usize>;
    fn movie_has_category(&self, movie_id: i64, category_id: i64) -> AppResult<bool>;
}

pub struct SqliteCatMovieRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCatMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

// ============================================================================
// CONNECTION-LEVEL HELPERS (shared with the movie store's transactions)
// ============================================================================

/// Insert one association. A pair that already exists is skipped.
/// Returns true when a row was written.
pub(crate) fn insert_link(conn: &Connection, movie_id: i64, category_id: i64) -> AppResult<bool> {
    match conn.execute(
        "INSERT INTO cat_movie (category_id, movie_id) VALUES (?1, ?2)",
        params![category_id, movie_id],
    ) {
        Ok(_) => Ok(true),
        Err(e) if is_duplicate_link(&e) => {
            log::warn!(
                "Category {} already attached to movie {}, skipping",
                category_id,
                movie_id
            );
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn delete_links_for_movie(conn: &Connection, movie_id: i64) -> AppResult<usize> {
    let removed = conn.execute("DELETE FROM cat_movie WHERE movie_id = ?1", params![movie_id])?;
    Ok(removed)
}

pub(crate) fn select_categories_for_movie(
    conn: &Connection,
    movie_id: i64,
) -> AppResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name
         FROM cat_movie cm
         JOIN category c ON c.id = cm.category_id
         WHERE cm.movie_id = ?1
         ORDER BY c.name",
    )?;

    let categories = stmt
        .query_map(params![movie_id], SqliteCategoryRepository::row_to_category)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

// Only the UNIQUE(category_id, movie_id) violation counts as a duplicate.
// Foreign key and other constraint failures still propagate.
fn is_duplicate_link(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl CatMovieRepository for SqliteCatMovieRepository {
    fn categories_for_movie(&self, movie_id: i64) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;
        select_categories_for_movie(&conn, movie_id)
    }

    fn movie_ids_for_category(&self, category_id: i64) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT movie_id FROM cat_movie WHERE category_id = ?1 ORDER BY movie_id",
        )?;

        let movie_ids = stmt
            .query_map(params![category_id], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(movie_ids)
    }

    fn add_category_to_movie(&self, movie_id: i64, category_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        insert_link(&conn, movie_id, category_id)?;
        Ok(())
    }

    fn remove_category_from_movie(&self, movie_id: i64, category_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM cat_movie WHERE movie_id = ?1 AND category_id = ?2",
            params![movie_id, category_id],
        )?;

        Ok(())
    }

    fn remove_categories_from_movie(&self, movie_id: i64) -> AppResult<usize> {
        let conn = self.pool.get()?;
        delete_links_for_movie(&conn, movie_id)
    }

    fn movie_has_category(&self, movie_id: i64, category_id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cat_movie WHERE movie_id = ?1 AND category_id = ?2)",
            params![movie_id, category_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }
}
