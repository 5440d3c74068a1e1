// src/error/mod.rs
//
// Library-wide error type

pub mod types;

pub use types::{AppError, AppResult};
