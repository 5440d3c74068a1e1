// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Provides the boundary between clients (the CLI) and services
// - Translates domain entities into DTOs
// - Holds the catalogue read cache

pub mod cache;
pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use cache::CatalogCache;
pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
