// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between a client (the CLI) and services
// - Commands accept DTOs, return DTOs
// - Commands convert errors to ErrorResponse
// - Commands NEVER contain business logic

pub mod category_commands;
pub mod movie_commands;
pub mod playback_commands;
pub mod warning_commands;

pub use category_commands::*;
pub use movie_commands::*;
pub use playback_commands::*;
pub use warning_commands::*;

use crate::application::error_handling::ErrorResponse;

pub type CommandResult<T> = Result<T, ErrorResponse>;
