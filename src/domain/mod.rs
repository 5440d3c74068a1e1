// src/domain/mod.rs
//
// Domain Root - entities and their invariants
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod category;
pub mod movie;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Category Domain
pub use category::{validate_category_name, Category};

// Movie Domain
pub use movie::{
    is_valid_movie_file, validate_movie, validate_personal_rating, Movie, ALLOWED_EXTENSIONS,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
