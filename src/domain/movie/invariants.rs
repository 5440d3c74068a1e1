use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

/// Media file extensions the collection accepts (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["mp4", "mpeg4"];

const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

/// Validates all Movie invariants
/// Runs before every create/update so invalid movies never reach the store
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_name(&movie.name)?;
    validate_file_link(&movie.file_link)?;
    validate_imdb_rating(movie.imdb_rating)?;
    validate_personal_rating(movie.personal_rating)?;
    Ok(())
}

/// True iff the path is non-empty and ends with an allowed extension
pub fn is_valid_movie_file(file_link: &str) -> bool {
    if file_link.trim().is_empty() {
        return false;
    }
    let lower = file_link.to_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// An absent personal rating is always valid
pub fn validate_personal_rating(rating: Option<f64>) -> DomainResult<()> {
    match rating {
        Some(r) if !in_rating_range(r) => Err(DomainError::InvariantViolation(
            "Personal rating must be between 0 and 10".to_string(),
        )),
        _ => Ok(()),
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_file_link(file_link: &str) -> DomainResult<()> {
    if file_link.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie file link cannot be empty".to_string(),
        ));
    }
    if !is_valid_movie_file(file_link) {
        return Err(DomainError::InvariantViolation(
            "Only .mp4 and .mpeg4 files are allowed".to_string(),
        ));
    }
    Ok(())
}

fn validate_imdb_rating(rating: f64) -> DomainResult<()> {
    if !in_rating_range(rating) {
        return Err(DomainError::InvariantViolation(
            "IMDB rating must be between 0 and 10".to_string(),
        ));
    }
    Ok(())
}

// NaN fails the range check
fn in_rating_range(rating: f64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Invariants that must hold true for Movie domain:
///
/// 1. Name cannot be empty
/// 2. File link cannot be empty and must end in .mp4 or .mpeg4
/// 3. IMDB rating lies in [0, 10]
/// 4. Personal rating, when present, lies in [0, 10]
/// 5. Categories hold no duplicate ids (maintained by Movie::add_category)

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_violation(movie: &Movie, needle: &str) {
        match validate_movie(movie) {
            Err(DomainError::InvariantViolation(msg)) => {
                assert!(msg.contains(needle), "unexpected message: {}", msg)
            }
            Ok(()) => panic!("Expected InvariantViolation containing {:?}", needle),
        }
    }

    #[test]
    fn test_valid_movie() {
        let mut movie = Movie::new("Blade Runner", 8.1, "/movies/blade_runner.mp4");
        movie.personal_rating = Some(10.0);
        assert!(validate_movie(&movie).is_ok());
    }

    #[test]
    fn test_movie_file_extensions() {
        assert!(is_valid_movie_file("x.mp4"));
        assert!(is_valid_movie_file("X.MPEG4"));
        assert!(is_valid_movie_file("/some/dir/Movie.Mp4"));
        assert!(!is_valid_movie_file("x.mkv"));
        assert!(!is_valid_movie_file("mp4"));
        assert!(!is_valid_movie_file(""));
        assert!(!is_valid_movie_file("   "));
    }

    #[test]
    fn test_empty_name_fails() {
        expect_violation(&Movie::new("  ", 5.0, "a.mp4"), "name cannot be empty");
    }

    #[test]
    fn test_empty_file_link_fails() {
        expect_violation(&Movie::new("A", 5.0, ""), "file link cannot be empty");
    }

    #[test]
    fn test_wrong_extension_fails() {
        expect_violation(&Movie::new("A", 5.0, "a.avi"), "Only .mp4 and .mpeg4");
    }

    #[test]
    fn test_imdb_rating_bounds() {
        assert!(validate_movie(&Movie::new("A", 0.0, "a.mp4")).is_ok());
        assert!(validate_movie(&Movie::new("A", 10.0, "a.mp4")).is_ok());
        expect_violation(&Movie::new("A", -0.1, "a.mp4"), "IMDB rating");
        expect_violation(&Movie::new("A", 10.1, "a.mp4"), "IMDB rating");
        expect_violation(&Movie::new("A", f64::NAN, "a.mp4"), "IMDB rating");
    }

    #[test]
    fn test_personal_rating_bounds() {
        assert!(validate_personal_rating(None).is_ok());
        assert!(validate_personal_rating(Some(0.0)).is_ok());
        assert!(validate_personal_rating(Some(11.0)).is_err());

        let mut movie = Movie::new("A", 5.0, "a.mp4");
        movie.personal_rating = Some(-1.0);
        expect_violation(&movie, "Personal rating");
    }
}
