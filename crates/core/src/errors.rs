//! Core error types for Goalpost.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the goal tracker.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Goal '{0}' not found")]
    GoalNotFound(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Badge '{badge_id}' was already awarded to user '{user_id}'")]
    BadgeAlreadyAwarded { user_id: String, badge_id: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification of an [`Error`], for callers deciding what to show
/// the user and what to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UniqueConstraintViolation,
    Validation,
    StorageUnavailable,
    IoFailure,
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The writer actor is gone and no write can be executed.
    #[error("Database writer is unavailable: {0}")]
    WriterUnavailable(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for caller-supplied values.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Value for '{field}' is out of range: {value}")]
    OutOfRange { field: String, value: String },

    #[error("Failed to (de)serialize value: {0}")]
    Serialization(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserNotFound(_) | Error::GoalNotFound(_) => ErrorKind::NotFound,
            Error::UsernameTaken(_) | Error::BadgeAlreadyAwarded { .. } => {
                ErrorKind::UniqueConstraintViolation
            }
            Error::Validation(_) | Error::InvalidCredentials | Error::InvalidConfigValue(_) => {
                ErrorKind::Validation
            }
            Error::Database(db) => match db {
                DatabaseError::NotFound(_) => ErrorKind::NotFound,
                DatabaseError::UniqueViolation(_) => ErrorKind::UniqueConstraintViolation,
                DatabaseError::ForeignKeyViolation(_) => ErrorKind::Validation,
                DatabaseError::ConnectionFailed(_)
                | DatabaseError::PoolCreationFailed(_)
                | DatabaseError::WriterUnavailable(_) => ErrorKind::StorageUnavailable,
                DatabaseError::QueryFailed(_)
                | DatabaseError::TransactionFailed(_)
                | DatabaseError::Internal(_) => ErrorKind::IoFailure,
            },
            Error::ConfigIO(_) | Error::Unexpected(_) => ErrorKind::IoFailure,
        }
    }

    /// True for any error that means "this row already exists".
    pub fn is_unique_violation(&self) -> bool {
        self.kind() == ErrorKind::UniqueConstraintViolation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::Serialization(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Database(DatabaseError::ConnectionFailed(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_taxonomy() {
        assert_eq!(
            Error::UsernameTaken("ana".into()).kind(),
            ErrorKind::UniqueConstraintViolation
        );
        assert_eq!(
            Error::Database(DatabaseError::UniqueViolation("x".into())).kind(),
            ErrorKind::UniqueConstraintViolation
        );
        assert_eq!(Error::GoalNotFound("g".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::Database(DatabaseError::PoolCreationFailed("x".into())).kind(),
            ErrorKind::StorageUnavailable
        );
        assert_eq!(
            Error::Database(DatabaseError::QueryFailed("x".into())).kind(),
            ErrorKind::IoFailure
        );
        assert_eq!(
            Error::Validation(ValidationError::MissingField("title".into())).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_invalid_credentials_is_a_validation_failure() {
        let err = Error::InvalidCredentials;
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_badge_already_awarded_is_unique_violation() {
        let err = Error::BadgeAlreadyAwarded {
            user_id: "u1".into(),
            badge_id: "beginner".into(),
        };
        assert!(err.is_unique_violation());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Badge 'beginner' was already awarded to user 'u1'"
        );
    }
}
