//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// The statement matched no rows
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("Record conflicts with an existing one: {0}")]
    Conflict(String),
}

impl DatabaseError {
    /// Classify an error returned by a query.
    ///
    /// `RowNotFound` becomes [`DatabaseError::NotFound`] and unique-constraint
    /// violations become [`DatabaseError::Conflict`], everything else is a
    /// plain [`DatabaseError::Query`].
    pub fn from_query(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => DatabaseError::NotFound,
            SqlxError::Database(db_error) if db_error.is_unique_violation() => {
                DatabaseError::Conflict(db_error.message().to_string())
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
