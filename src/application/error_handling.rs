// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides consistent error format for any client (CLI, JSON output)
// - Logs backend errors for debugging

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::error::AppError;

/// Standard error response for clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found
    NotFound,

    /// Invalid input, including backend constraint violations
    Validation,

    /// Domain invariant violation
    DomainError,

    /// Database/persistence or connectivity error
    Database,

    /// External player error
    ExternalService,

    FileSystem,

    /// Missing or invalid settings
    Configuration,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        if error.is_constraint_violation() {
            log::debug!("Constraint violation: {}", error);
            return Self::new(
                ErrorType::Validation,
                "The change conflicts with existing data".to_string(),
                Some(error.to_string()),
            );
        }

        match error {
            AppError::NotFound => {
                Self::new(ErrorType::NotFound, "Resource not found".to_string(), None)
            }

            // The invariant text is already user-facing
            AppError::Domain(DomainError::InvariantViolation(message)) => {
                Self::new(ErrorType::DomainError, message, None)
            }

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed".to_string(),
                    Some(db_error.to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection error: {}", pool_error);
                Self::new(
                    ErrorType::Database,
                    "Database connection failed".to_string(),
                    Some(pool_error),
                )
            }

            AppError::Config(message) => Self::new(
                ErrorType::Configuration,
                "Invalid configuration".to_string(),
                Some(message),
            ),

            AppError::Player(message) => Self::new(
                ErrorType::ExternalService,
                "Could not start the external player".to_string(),
                Some(message),
            ),

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(
                    ErrorType::Internal,
                    "Data serialization failed".to_string(),
                    None,
                )
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed".to_string(),
                    Some(io_error.to_string()),
                )
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    fn new(error_type: ErrorType, message: String, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message,
            details,
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message.into(), None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::NotFound);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Resource not found");
        assert!(!error.success);
    }

    #[test]
    fn test_domain_error_keeps_invariant_message() {
        let error = ErrorResponse::from_app_error(AppError::Domain(
            DomainError::InvariantViolation("Movie name cannot be empty".to_string()),
        ));
        assert_eq!(error.error_type, ErrorType::DomainError);
        assert_eq!(error.to_string(), "Movie name cannot be empty");
    }

    #[test]
    fn test_constraint_violation_is_validation() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: AppError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();

        let response = ErrorResponse::from(err);
        assert_eq!(response.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_connectivity_and_config_errors() {
        let pool = ErrorResponse::from_app_error(AppError::Pool("auto_create is disabled".into()));
        assert_eq!(pool.error_type, ErrorType::Database);
        assert_eq!(pool.details.as_deref(), Some("auto_create is disabled"));

        let config = ErrorResponse::from_app_error(AppError::Config("bad level".into()));
        assert_eq!(config.error_type, ErrorType::Configuration);

        let player = ErrorResponse::from_app_error(AppError::Player("missing".into()));
        assert_eq!(player.error_type, ErrorType::ExternalService);
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Invalid input");
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid input");
    }

    #[test]
    fn test_serialization() {
        let error = ErrorResponse::not_found("Movie");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("not_found"));
        assert!(json.contains("Movie not found"));
    }
}
