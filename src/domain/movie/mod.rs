pub mod entity;
pub mod invariants;

pub use entity::Movie;
pub use invariants::{
    is_valid_movie_file, validate_movie, validate_personal_rating, ALLOWED_EXTENSIONS,
};
