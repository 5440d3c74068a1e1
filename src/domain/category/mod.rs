//! Category Invariants:
//!
//! 1. Name cannot be empty or whitespace
//! 2. Name is unique across all categories (checked against the store by
//!    the category service, not here)
//! 3. Deleting a category removes it from every movie, never the movies

pub mod entity;

pub use entity::Category;

use crate::domain::{DomainError, DomainResult};

/// Validates the store-independent Category invariants
pub fn validate_category_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_fails() {
        assert!(validate_category_name("   ").is_err());
        assert!(validate_category_name("").is_err());
    }

    #[test]
    fn test_regular_name_passes() {
        assert!(validate_category_name("Documentary").is_ok());
    }
}
