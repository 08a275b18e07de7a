//! Core error types for the Spendwise application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::budgets::BudgetError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Budget operation failed: {0}")]
    Budget(#[from] BudgetError),

    /// The record does not exist or is not owned by the caller.
    /// Both cases produce the same message so ownership is never leaked.
    #[error("{0} not found")]
    NotFound(String),
}

impl Error {
    pub fn not_found(entity: &str) -> Self {
        Error::NotFound(entity.to_string())
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
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

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and business-rule checks.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("'{field}' must be at least {min}")]
    AmountTooSmall { field: String, min: Decimal },

    #[error("'{field}' cannot exceed {max}")]
    AmountTooLarge { field: String, max: Decimal },

    #[error("'{field}' cannot have more than {places} decimal places")]
    TooManyDecimalPlaces { field: String, places: u32 },

    #[error("Amounts are too large to combine: {0}")]
    AmountOverflow(String),

    #[error("Category limit {limit} cannot exceed total budget limit {total_limit}")]
    CategoryLimitExceedsTotal { limit: Decimal, total_limit: Decimal },

    #[error("Total budget limit {total_limit} cannot be less than sum of category limits {allocated}")]
    TotalBelowAllocated {
        total_limit: Decimal,
        allocated: Decimal,
    },

    #[error("Category {0} already has a limit in this budget")]
    DuplicateCategory(String),

    #[error("Frequency is required for recurring income")]
    MissingFrequency,

    #[error("Date {0} cannot be in the future")]
    FutureDate(chrono::NaiveDate),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}
