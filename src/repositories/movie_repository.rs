// src/repositories/movie_repository.rs
//
// Movie rows plus their categories.
//
// Listing queries attach categories with ONE follow-up query per result set
// (an IN over the returned ids), never one query per movie.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Months, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::db::ConnectionPool;
use crate::domain::{Category, Movie};
use crate::error::{AppError, AppResult};

use super::cat_movie_repository::{delete_links_for_movie, insert_link, select_categories_for_movie};

const MOVIE_COLUMNS: &str = "id, name, imdb_rating, personal_rating, file_link, last_view";

// Stays below SQLite's default host parameter limit (32766)
const HYDRATION_BATCH_SIZE: usize = 32_000;

#[cfg_attr(test, mockall::automock)]
pub trait MovieRepository: Send + Sync {
    /// All movies ordered by name, categories attached
    fn list_all(&self) -> AppResult<Vec<Movie>>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>>;
    /// Case-insensitive substring match on the name, ordered by name
    fn search(&self, query: &str) -> AppResult<Vec<Movie>>;
    /// Insert the movie and its associations; returns it with the new id
    fn create(&self, movie: &Movie) -> AppResult<Movie>;
    /// Overwrite the movie row and replace its associations
    fn update(&self, movie: &Movie) -> AppResult<()>;
    /// Stamp the movie as viewed now; returns the stored timestamp
    fn update_last_viewed(&self, id: i64) -> AppResult<DateTime<Utc>>;
    fn update_personal_rating(&self, id: i64, rating: Option<f64>) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
    /// Rated below `rating_threshold` AND last viewed more than
    /// `years_unplayed` years ago. Missing rating or view never qualifies.
    fn find_for_warning(&self, rating_threshold: f64, years_unplayed: u32)
        -> AppResult<Vec<Movie>>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let last_view = row
            .get::<_, Option<String>>(5)?
            .map(|raw| parse_timestamp(5, &raw))
            .transpose()?;

        Ok(Movie {
            id: row.get(0)?,
            name: row.get(1)?,
            imdb_rating: row.get(2)?,
            personal_rating: row.get(3)?,
            file_link: row.get(4)?,
            last_view,
            categories: Vec::new(),
        })
    }

    /// Run a movie query and batch-hydrate the categories of every row
    fn query_hydrated<P: rusqlite::Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> AppResult<Vec<Movie>> {
        let mut stmt = conn.prepare(sql)?;
        let mut movies = stmt
            .query_map(params, Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        hydrate_categories(conn, &mut movies)?;
        Ok(movies)
    }
}

/// Attach categories to every movie with one query per batch of ids.
/// An empty slice issues no query at all.
fn hydrate_categories(conn: &Connection, movies: &mut [Movie]) -> AppResult<()> {
    if movies.is_empty() {
        return Ok(());
    }

    let index: HashMap<i64, usize> = movies
        .iter()
        .enumerate()
        .map(|(pos, movie)| (movie.id, pos))
        .collect();
    let ids: Vec<i64> = movies.iter().map(|movie| movie.id).collect();

    for batch in ids.chunks(HYDRATION_BATCH_SIZE) {
        let placeholders = vec!["?"; batch.len()].join(", ");
        let sql = format!(
            "SELECT cm.movie_id, c.id, c.name
             FROM cat_movie cm
             JOIN category c ON c.id = cm.category_id
             WHERE cm.movie_id IN ({})
             ORDER BY cm.movie_id, c.name",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(batch.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, Category::with_id(row.get(1)?, row.get::<_, String>(2)?)))
        })?;

        for row in rows {
            let (movie_id, category) = row?;
            if let Some(&pos) = index.get(&movie_id) {
                movies[pos].add_category(category);
            }
        }
    }

    log::debug!("Hydrated categories for {} movies", movies.len());
    Ok(())
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(column: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

// LIKE wildcards in user input match literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl MovieRepository for SqliteMovieRepository {
    fn list_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        Self::query_hydrated(
            &conn,
            &format!("SELECT {} FROM movie ORDER BY name", MOVIE_COLUMNS),
            [],
        )
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM movie WHERE id = ?1", MOVIE_COLUMNS))?;

        let mut movie = match stmt.query_row(params![id], Self::row_to_movie) {
            Ok(movie) => movie,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(AppError::Database(e)),
        };

        movie.categories = select_categories_for_movie(&conn, id)?;
        Ok(Some(movie))
    }

    fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        Self::query_hydrated(
            &conn,
            &format!(
                "SELECT {} FROM movie WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name",
                MOVIE_COLUMNS
            ),
            params![like_pattern(query.trim())],
        )
    }

    fn create(&self, movie: &Movie) -> AppResult<Movie> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO movie (name, imdb_rating, personal_rating, file_link, last_view)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                movie.name,
                movie.imdb_rating,
                movie.personal_rating,
                movie.file_link,
                movie.last_view.as_ref().map(format_timestamp),
            ],
        )?;
        let id = tx.last_insert_rowid();

        for category in &movie.categories {
            insert_link(&tx, id, category.id)?;
        }

        tx.commit()?;

        let mut created = movie.clone();
        created.id = id;
        Ok(created)
    }

    fn update(&self, movie: &Movie) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE movie
             SET name = ?1, imdb_rating = ?2, personal_rating = ?3, file_link = ?4, last_view = ?5
             WHERE id = ?6",
            params![
                movie.name,
                movie.imdb_rating,
                movie.personal_rating,
                movie.file_link,
                movie.last_view.as_ref().map(format_timestamp),
                movie.id,
            ],
        )?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }

        // Full replace of the association set, committed with the row
        delete_links_for_movie(&tx, movie.id)?;
        for category in &movie.categories {
            insert_link(&tx, movie.id, category.id)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn update_last_viewed(&self, id: i64) -> AppResult<DateTime<Utc>> {
        let conn = self.pool.get()?;
        let now = Utc::now().trunc_subsecs(3);

        let rows = conn.execute(
            "UPDATE movie SET last_view = ?1 WHERE id = ?2",
            params![format_timestamp(&now), id],
        )?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(now)
    }

    fn update_personal_rating(&self, id: i64, rating: Option<f64>) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows = conn.execute(
            "UPDATE movie SET personal_rating = ?1 WHERE id = ?2",
            params![rating, id],
        )?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        // cat_movie rows go with it (ON DELETE CASCADE)
        let rows = conn.execute("DELETE FROM movie WHERE id = ?1", params![id])?;

        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn find_for_warning(
        &self,
        rating_threshold: f64,
        years_unplayed: u32,
    ) -> AppResult<Vec<Movie>> {
        let cutoff = Utc::now()
            .checked_sub_months(Months::new(years_unplayed.saturating_mul(12)))
            .ok_or_else(|| AppError::Other(format!("Invalid warning window: {} years", years_unplayed)))?;

        let conn = self.pool.get()?;

        Self::query_hydrated(
            &conn,
            &format!(
                "SELECT {} FROM movie
                 WHERE personal_rating IS NOT NULL AND personal_rating < ?1
                   AND last_view IS NOT NULL AND last_view < ?2
                 ORDER BY name",
                MOVIE_COLUMNS
            ),
            params![rating_threshold, format_timestamp(&cutoff)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};
    use crate::repositories::category_repository::{CategoryRepository, SqliteCategoryRepository};
    use crate::repositories::cat_movie_repository::{CatMovieRepository, SqliteCatMovieRepository};
    use chrono::Duration;
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;
    use std::cell::RefCell;

    // ========================================================================
    // STATEMENT TRACE
    // ========================================================================

    thread_local! {
        static STATEMENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn record_statement(sql: &str) {
        STATEMENTS.with(|s| s.borrow_mut().push(sql.to_string()));
    }

    /// Number of SELECT statements executed on this thread while `f` runs
    fn selects_during<T>(f: impl FnOnce() -> T) -> (T, usize) {
        STATEMENTS.with(|s| s.borrow_mut().clear());
        let out = f();
        let count = STATEMENTS.with(|s| {
            s.borrow()
                .iter()
                .filter(|sql| sql.trim_start().starts_with("SELECT"))
                .count()
        });
        (out, count)
    }

    fn traced_pool() -> (tempfile::TempDir, Arc<ConnectionPool>) {
        let dir = tempfile::tempdir().unwrap();
        let manager = SqliteConnectionManager::file(dir.path().join("traced.db")).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.trace(Some(record_statement));
            Ok(())
        });
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        (dir, Arc::new(pool))
    }

    // ========================================================================
    // FIXTURES
    // ========================================================================

    struct Fixture {
        movies: SqliteMovieRepository,
        categories: SqliteCategoryRepository,
        links: SqliteCatMovieRepository,
    }

    fn fixture(pool: Arc<ConnectionPool>) -> Fixture {
        Fixture {
            movies: SqliteMovieRepository::new(pool.clone()),
            categories: SqliteCategoryRepository::new(pool.clone()),
            links: SqliteCatMovieRepository::new(pool),
        }
    }

    impl Fixture {
        fn category(&self, name: &str) -> Category {
            self.categories.create(&Category::new(name)).unwrap()
        }

        fn movie(&self, name: &str, imdb: f64, categories: &[&Category]) -> Movie {
            let mut movie = Movie::new(name, imdb, format!("/films/{}.mp4", name));
            for category in categories {
                movie.add_category((*category).clone());
            }
            self.movies.create(&movie).unwrap()
        }
    }

    fn names(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.name.as_str()).collect()
    }

    fn category_ids(movie: &Movie) -> Vec<i64> {
        movie.categories.iter().map(|c| c.id).collect()
    }

    // ========================================================================
    // HYDRATION
    // ========================================================================

    #[test]
    fn test_list_all_matches_get_by_id() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        let crime = f.category("Crime");
        let war = f.category("War");

        f.movie("Zodiac", 7.7, &[&drama, &crime]);
        f.movie("Apocalypse Now", 8.4, &[&war, &drama]);
        f.movie("Playtime", 7.8, &[]);

        let listed = f.movies.list_all().unwrap();
        assert_eq!(names(&listed), vec!["Apocalypse Now", "Playtime", "Zodiac"]);

        for movie in &listed {
            let single = f.movies.get_by_id(movie.id).unwrap().unwrap();
            assert_eq!(category_ids(movie), category_ids(&single));
        }

        let zodiac = &listed[2];
        assert_eq!(zodiac.categories_joined(), "Crime, Drama");
        assert!(listed[1].categories.is_empty());
    }

    #[test]
    fn test_list_all_uses_two_queries() {
        let (_dir, pool) = traced_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        for i in 0..5 {
            f.movie(&format!("Movie {}", i), 6.0, &[&drama]);
        }

        let (movies, selects) = selects_during(|| f.movies.list_all().unwrap());

        assert_eq!(movies.len(), 5);
        assert!(movies.iter().all(|m| m.categories.len() == 1));
        assert_eq!(selects, 2);
    }

    #[test]
    fn test_empty_list_skips_category_query() {
        let (_dir, pool) = traced_pool();
        let f = fixture(pool);

        let (movies, selects) = selects_during(|| f.movies.list_all().unwrap());

        assert!(movies.is_empty());
        assert_eq!(selects, 1);
    }

    #[test]
    fn test_empty_search_result_skips_category_query() {
        let (_dir, pool) = traced_pool();
        let f = fixture(pool);
        f.movie("Stalker", 8.1, &[]);

        let (movies, selects) = selects_during(|| f.movies.search("solaris").unwrap());

        assert!(movies.is_empty());
        assert_eq!(selects, 1);
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    #[test]
    fn test_create_and_get_round_trip_fields() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let viewed = Utc::now().trunc_subsecs(3) - Duration::days(10);

        let mut movie = Movie::new("Paterson", 7.4, "/films/paterson.mp4");
        movie.personal_rating = Some(8.5);
        movie.last_view = Some(viewed);
        let created = f.movies.create(&movie).unwrap();

        let loaded = f.movies.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Paterson");
        assert_eq!(loaded.imdb_rating, 7.4);
        assert_eq!(loaded.personal_rating, Some(8.5));
        assert_eq!(loaded.file_link, "/films/paterson.mp4");
        assert_eq!(loaded.last_view, Some(viewed));
    }

    #[test]
    fn test_get_by_id_missing_is_none() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);

        assert!(f.movies.get_by_id(7).unwrap().is_none());
    }

    #[test]
    fn test_update_replaces_associations() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        let comedy = f.category("Comedy");
        let music = f.category("Music");

        let mut movie = f.movie("Whiplash", 8.5, &[&drama, &music]);
        movie.name = "Whiplash (2014)".to_string();
        movie.set_categories(vec![comedy.clone(), music.clone()]);
        f.movies.update(&movie).unwrap();

        let loaded = f.movies.get_by_id(movie.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Whiplash (2014)");
        assert_eq!(loaded.categories_joined(), "Comedy, Music");
        assert!(!f.links.movie_has_category(movie.id, drama.id).unwrap());
    }

    #[test]
    fn test_failed_update_rolls_back() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");

        let mut movie = f.movie("Amour", 7.9, &[&drama]);
        movie.name = "Renamed".to_string();
        movie.set_categories(vec![Category::with_id(9_999, "Missing")]);

        assert!(f.movies.update(&movie).is_err());

        let loaded = f.movies.get_by_id(movie.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Amour");
        assert_eq!(category_ids(&loaded), vec![drama.id]);
    }

    #[test]
    fn test_failed_create_leaves_no_row() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);

        let mut movie = Movie::new("Orphan", 6.0, "orphan.mp4");
        movie.add_category(Category::with_id(4_242, "Missing"));

        assert!(f.movies.create(&movie).is_err());
        assert!(f.movies.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_categories_on_create_are_ignored() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");

        let mut movie = Movie::new("Ida", 7.4, "ida.mp4");
        // Bypass add_category so the duplicate reaches the store
        movie.categories = vec![drama.clone(), drama.clone()];
        let created = f.movies.create(&movie).unwrap();

        assert_eq!(f.links.movie_ids_for_category(drama.id).unwrap(), vec![created.id]);
    }

    #[test]
    fn test_update_last_viewed_and_rating() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let movie = f.movie("Tampopo", 7.7, &[]);

        let stamp = f.movies.update_last_viewed(movie.id).unwrap();
        f.movies.update_personal_rating(movie.id, Some(9.0)).unwrap();

        let loaded = f.movies.get_by_id(movie.id).unwrap().unwrap();
        assert_eq!(loaded.last_view, Some(stamp));
        assert_eq!(loaded.personal_rating, Some(9.0));

        f.movies.update_personal_rating(movie.id, None).unwrap();
        let cleared = f.movies.get_by_id(movie.id).unwrap().unwrap();
        assert_eq!(cleared.personal_rating, None);
        assert_eq!(cleared.imdb_rating, 7.7);
    }

    #[test]
    fn test_mutating_missing_movie_is_not_found() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let mut ghost = Movie::new("Ghost", 5.0, "ghost.mp4");
        ghost.id = 77;

        assert!(matches!(f.movies.update(&ghost), Err(AppError::NotFound)));
        assert!(matches!(f.movies.update_last_viewed(77), Err(AppError::NotFound)));
        assert!(matches!(
            f.movies.update_personal_rating(77, Some(1.0)),
            Err(AppError::NotFound)
        ));
        assert!(matches!(f.movies.delete(77), Err(AppError::NotFound)));
    }

    #[test]
    fn test_delete_movie_removes_associations() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        let movie = f.movie("Roma", 7.7, &[&drama]);

        f.movies.delete(movie.id).unwrap();

        assert!(f.movies.get_by_id(movie.id).unwrap().is_none());
        assert!(f.links.categories_for_movie(movie.id).unwrap().is_empty());
        assert!(f.links.movie_ids_for_category(drama.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_category_disappears_from_movies() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        let war = f.category("War");
        f.movie("Dunkirk", 7.8, &[&drama, &war]);
        f.movie("1917", 8.2, &[&war]);

        f.categories.delete(war.id).unwrap();

        let listed = f.movies.list_all().unwrap();
        assert!(listed.iter().all(|m| !m.has_category("War")));
        assert_eq!(listed[1].categories_joined(), "Drama");
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let drama = f.category("Drama");
        f.movie("The Godfather", 9.2, &[&drama]);
        f.movie("Godzilla", 6.4, &[]);
        f.movie("Heat", 8.3, &[]);

        let found = f.movies.search("GOD").unwrap();

        assert_eq!(names(&found), vec!["Godzilla", "The Godfather"]);
        assert_eq!(found[1].categories_joined(), "Drama");
        assert_eq!(f.movies.search("").unwrap().len(), 3);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        f.movie("100% Wolf", 5.6, &[]);
        f.movie("1000 Wolves", 5.0, &[]);
        f.movie("A_B", 5.0, &[]);
        f.movie("AxB", 5.0, &[]);

        assert_eq!(names(&f.movies.search("100%").unwrap()), vec!["100% Wolf"]);
        assert_eq!(names(&f.movies.search("a_b").unwrap()), vec!["A_B"]);
    }

    // ========================================================================
    // WARNINGS
    // ========================================================================

    fn viewed_movie(f: &Fixture, name: &str, rating: Option<f64>, days_ago: Option<i64>) -> Movie {
        let mut movie = Movie::new(name, 6.5, format!("{}.mp4", name));
        movie.personal_rating = rating;
        movie.last_view = days_ago.map(|days| Utc::now() - Duration::days(days));
        f.movies.create(&movie).unwrap()
    }

    #[test]
    fn test_find_for_warning() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let three_years = 3 * 365;

        viewed_movie(&f, "Stale and bad", Some(5.0), Some(three_years));
        viewed_movie(&f, "Never played", Some(5.0), None);
        viewed_movie(&f, "Never rated", None, Some(three_years));
        viewed_movie(&f, "Stale but good", Some(8.0), Some(three_years));
        viewed_movie(&f, "Recent and bad", Some(2.0), Some(30));
        viewed_movie(&f, "At threshold", Some(6.0), Some(three_years));

        let flagged = f.movies.find_for_warning(6.0, 2).unwrap();

        assert_eq!(names(&flagged), vec!["Stale and bad"]);
    }

    #[test]
    fn test_find_for_warning_hydrates_categories() {
        let (_dir, pool) = create_test_pool();
        let f = fixture(pool);
        let horror = f.category("Horror");
        let mut movie = viewed_movie(&f, "Slasher", Some(3.0), Some(1_000));
        movie.add_category(horror);
        f.movies.update(&movie).unwrap();

        let flagged = f.movies.find_for_warning(6.0, 2).unwrap();

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].categories_joined(), "Horror");
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("a%b_c\\"), "%a\\%b\\_c\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }
}
