// src/main.rs
//
// moviecol - command line client for the movie collection

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use movie_collection::application::commands::*;
use movie_collection::application::dto::{CategoryDto, MovieDto, MovieQueryDto, SaveMovieDto};
use movie_collection::application::AppState;
use movie_collection::config::Settings;
use movie_collection::db::{
    bootstrap_database, create_connection_pool, get_connection, get_database_stats,
    verify_database_integrity,
};

#[derive(Parser)]
#[command(name = "moviecol")]
#[command(about = "Private movie collection - catalogue, filter and play your movie files", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML). Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, apply the schema and seed default categories
    Init,

    /// List movies with optional filters
    List {
        /// Title contains (case-insensitive)
        #[arg(short, long)]
        title: Option<String>,
        /// Has any of these categories (repeatable)
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,
        /// Minimum IMDB rating, inclusive
        #[arg(long)]
        min_imdb: Option<f64>,
        /// Sort key: title, imdb, personal or category
        #[arg(short, long, default_value = "title")]
        sort: String,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Search movie names in the database
    Search {
        query: String,
    },

    /// Show one movie
    Show {
        id: i64,
    },

    /// Add a movie
    Add {
        name: String,
        /// Path to the .mp4 / .mpeg4 file
        file: String,
        #[arg(long, default_value_t = 0.0)]
        imdb: f64,
        #[arg(long)]
        personal: Option<f64>,
        /// Category id (repeatable)
        #[arg(short = 'c', long = "category")]
        categories: Vec<i64>,
    },

    /// Edit a movie; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        imdb: Option<f64>,
        #[arg(long)]
        personal: Option<f64>,
        /// Replace the categories with these ids (repeatable)
        #[arg(short = 'c', long = "category")]
        categories: Vec<i64>,
        /// Remove all categories
        #[arg(long, conflicts_with = "categories")]
        clear_categories: bool,
    },

    /// Set or clear the personal rating
    Rate {
        id: i64,
        /// Rating between 0 and 10
        #[arg(required_unless_present = "clear")]
        rating: Option<f64>,
        /// Remove the rating instead
        #[arg(long, conflicts_with = "rating")]
        clear: bool,
    },

    /// Delete a movie
    Delete {
        id: i64,
    },

    /// Open a movie in the default player and record the view
    Play {
        id: i64,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Movies rated low and not watched for years
    Warnings,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Add a category
    Add { name: String },
    /// Rename a category
    Rename { id: i64, name: String },
    /// Delete a category (movies keep existing)
    Delete { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    init_logging(&settings, cli.verbose)?;

    let state = open_state(&settings)?;

    if !matches!(cli.command, Commands::Init | Commands::Warnings) {
        startup_warning(&state);
    }

    run(&state, cli.command, cli.json)
}

/// Open the pool, bring the schema up to date and wire the services
fn open_state(settings: &Settings) -> Result<AppState> {
    let pool = Arc::new(create_connection_pool(&settings.database)?);

    let conn = get_connection(&pool)?;
    let status = bootstrap_database(&conn)?;
    log::info!("{}", status);
    drop(conn);

    Ok(AppState::new(pool))
}

fn init_logging(settings: &Settings, verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        settings.logging.level_filter()?
    };

    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")
}

fn startup_warning(state: &AppState) {
    match get_movie_warnings(state) {
        Ok(warnings) if !warnings.movies.is_empty() => {
            log::warn!("{}", warnings.message.trim_end());
        }
        Ok(_) => {}
        Err(e) => log::warn!("Could not check for stale movies: {}", e),
    }
}

fn run(state: &AppState, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Init => cmd_init(state, json),
        Commands::List {
            title,
            categories,
            min_imdb,
            sort,
            desc,
        } => {
            let query = MovieQueryDto {
                title,
                categories,
                min_imdb_rating: min_imdb,
                sort_key: Some(sort),
                ascending: !desc,
            };
            print_movies(&list_movies(state, &query)?, json)
        }
        Commands::Search { query } => print_movies(&search_movies(state, &query)?, json),
        Commands::Show { id } => match get_movie(state, id)? {
            Some(movie) => print_movie(&movie, json),
            None => anyhow::bail!("Movie {} not found", id),
        },
        Commands::Add {
            name,
            file,
            imdb,
            personal,
            categories,
        } => {
            let dto = SaveMovieDto {
                id: None,
                name,
                imdb_rating: imdb,
                personal_rating: personal,
                file_link: file,
                category_ids: categories,
            };
            let created = create_movie(state, dto)?;
            if !json {
                println!("Added movie #{}", created.id);
            }
            print_movie(&created, json)
        }
        Commands::Edit {
            id,
            name,
            file,
            imdb,
            personal,
            categories,
            clear_categories,
        } => {
            let current = get_movie(state, id)?
                .with_context(|| format!("Movie {} not found", id))?;

            let category_ids = if clear_categories {
                Vec::new()
            } else if categories.is_empty() {
                current.categories.iter().map(|c| c.id).collect()
            } else {
                categories
            };

            let dto = SaveMovieDto {
                id: Some(id),
                name: name.unwrap_or(current.name),
                imdb_rating: imdb.unwrap_or(current.imdb_rating),
                personal_rating: personal.or(current.personal_rating),
                file_link: file.unwrap_or(current.file_link),
                category_ids,
            };
            print_movie(&update_movie(state, dto)?, json)
        }
        Commands::Rate { id, rating, clear } => {
            let rating = if clear { None } else { rating };
            rate_movie(state, id, rating)?;
            let text = match rating {
                Some(r) => format!("Movie #{} rated {:.1}", id, r),
                None => format!("Rating of movie #{} cleared", id),
            };
            print_outcome(
                json,
                &text,
                json!({ "action": "rate", "id": id, "personal_rating": rating }),
            )
        }
        Commands::Delete { id } => {
            delete_movie(state, id)?;
            print_outcome(
                json,
                &format!("Deleted movie #{}", id),
                json!({ "action": "delete", "id": id }),
            )
        }
        Commands::Play { id } => {
            let movie = play_movie(state, id)?;
            if !json {
                println!("Playing {}", movie.name);
            }
            print_movie(&movie, json)
        }
        Commands::Category { action } => run_category(state, action, json),
        Commands::Warnings => {
            let warnings = get_movie_warnings(state)?;
            if json {
                print_json(&warnings)
            } else if warnings.movies.is_empty() {
                println!("No movies to warn about.");
                Ok(())
            } else {
                print!("{}", warnings.message);
                Ok(())
            }
        }
    }
}

fn run_category(state: &AppState, action: CategoryAction, json: bool) -> Result<()> {
    match action {
        CategoryAction::List => print_categories(&list_categories(state)?, json),
        CategoryAction::Add { name } => {
            let created = create_category(state, &name)?;
            print_outcome(
                json,
                &format!("Added category #{} {}", created.id, created.name),
                json!({ "action": "category_add", "id": created.id, "name": created.name }),
            )
        }
        CategoryAction::Rename { id, name } => {
            let renamed = rename_category(state, id, &name)?;
            print_outcome(
                json,
                &format!("Category #{} is now {}", renamed.id, renamed.name),
                json!({ "action": "category_rename", "id": renamed.id, "name": renamed.name }),
            )
        }
        CategoryAction::Delete { id } => {
            delete_category(state, id)?;
            print_outcome(
                json,
                &format!("Deleted category #{}", id),
                json!({ "action": "category_delete", "id": id }),
            )
        }
    }
}

fn cmd_init(state: &AppState, json: bool) -> Result<()> {
    let conn = get_connection(&state.pool)?;
    verify_database_integrity(&conn)?;
    let stats = get_database_stats(&conn)?;

    if json {
        return print_json(&stats);
    }

    println!("Database ready");
    println!("  Movies:       {}", stats.movie_count);
    println!("  Categories:   {}", stats.category_count);
    println!("  Associations: {}", stats.link_count);
    println!("  Size:         {} bytes", stats.size_bytes);
    Ok(())
}

// ============================================================================
// OUTPUT
// ============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Result line of a mutating command: the text, or the outcome object
/// with `"success": true` under `--json`
fn render_outcome(json: bool, text: &str, mut outcome: Value) -> Result<String> {
    if !json {
        return Ok(text.to_string());
    }
    if let Value::Object(fields) = &mut outcome {
        fields.insert("success".to_string(), Value::Bool(true));
    }
    Ok(serde_json::to_string_pretty(&outcome)?)
}

fn print_outcome(json: bool, text: &str, outcome: Value) -> Result<()> {
    println!("{}", render_outcome(json, text, outcome)?);
    Ok(())
}

fn print_movies(movies: &[MovieDto], json: bool) -> Result<()> {
    if json {
        return print_json(&movies);
    }
    if movies.is_empty() {
        println!("No movies found. Use 'moviecol add <name> <file>' to add one.");
        return Ok(());
    }

    println!("{:>5}  {:>5}  {:>9}  {:<30}  {}", "ID", "IMDB", "Personal", "Name", "Categories");
    println!("{}", "-".repeat(80));
    for movie in movies {
        println!(
            "{:>5}  {:>5.1}  {:>9}  {:<30}  {}",
            movie.id,
            movie.imdb_rating,
            movie.personal_rating_display,
            truncate(&movie.name, 30),
            movie.categories_display
        );
    }
    Ok(())
}

fn print_movie(movie: &MovieDto, json: bool) -> Result<()> {
    if json {
        return print_json(movie);
    }

    println!("Movie #{}", movie.id);
    println!();
    println!("Name:        {}", movie.name);
    println!("IMDB:        {:.1}", movie.imdb_rating);
    println!("Personal:    {}", movie.personal_rating_display);
    println!("File:        {}", movie.file_link);
    println!(
        "Last view:   {}",
        movie.last_view.as_deref().unwrap_or("Never")
    );
    println!("Categories:  {}", movie.categories_display);
    Ok(())
}

fn print_categories(categories: &[CategoryDto], json: bool) -> Result<()> {
    if json {
        return print_json(&categories);
    }
    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }

    for category in categories {
        println!("{:>5}  {}", category.id, category.name);
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars - 1).collect();
        format!("{}…", cut)
    }
}
