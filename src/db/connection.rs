// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - One pooled connection per store operation
// - Clear error propagation

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

const APP_DIR_NAME: &str = "movie-collection";
const DATABASE_FILE_NAME: &str = "movies.db";

/// Resolve the database file path
///
/// An explicit `path` setting wins. Otherwise the database lives in the
/// application data directory: {APP_DATA}/movie-collection/movies.db
pub fn get_database_path(settings: &DatabaseSettings) -> AppResult<PathBuf> {
    if let Some(path) = &settings.path {
        return Ok(path.clone());
    }

    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join(APP_DIR_NAME).join(DATABASE_FILE_NAME))
}

/// Create a connection pool
///
/// Pool configuration:
/// - Size and checkout timeout from settings
/// - Foreign keys enabled (cascading deletes rely on it)
/// - WAL journal, busy timeout matching the checkout timeout
///
/// With `auto_create` disabled a missing database file is a connection
/// error instead of silently creating an empty database.
pub fn create_connection_pool(settings: &DatabaseSettings) -> AppResult<ConnectionPool> {
    let db_path = get_database_path(settings)?;

    if !db_path.exists() {
        if !settings.auto_create {
            return Err(AppError::Pool(format!(
                "Database '{}' does not exist and auto_create is disabled. \
                 Create it or set database.auto_create = true.",
                db_path.display()
            )));
        }
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("Creating database at {}", db_path.display());
    }

    let busy_timeout_ms = settings.timeout_seconds.saturating_mul(1000);
    let manager = SqliteConnectionManager::file(&db_path).with_init(move |conn| {
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(settings.pool_size.max(1))
        .connection_timeout(Duration::from_secs(settings.timeout_seconds.max(1)))
        .build(manager)
        .map_err(|e| {
            AppError::Pool(format!(
                "Failed to open database {}: {}",
                db_path.display(),
                e
            ))
        })?;

    log::debug!("Connection pool ready for {}", db_path.display());
    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a pool over a fresh database in a temporary directory, with the
/// schema applied. Keep the returned directory alive for the test's duration.
#[cfg(test)]
pub(crate) fn create_test_pool() -> (tempfile::TempDir, std::sync::Arc<ConnectionPool>) {
    let dir = tempfile::tempdir().unwrap();
    let settings = DatabaseSettings {
        path: Some(dir.path().join("test.db")),
        timeout_seconds: 5,
        auto_create: true,
        pool_size: 2,
    };
    let pool = create_connection_pool(&settings).unwrap();
    crate::db::initialize_database(&pool.get().unwrap()).unwrap();
    (dir, std::sync::Arc::new(pool))
}
