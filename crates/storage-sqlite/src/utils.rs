//! Helpers shared by the repositories: text column codecs and `IN (...)` chunking.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise_core::constants::DATE_FORMAT;

use crate::errors::StorageError;

/// Upper bound on bound parameters per `IN (...)` query. SQLite's default
/// limit is 999, this leaves room for the other parameters.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(column: &str, value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", column, value, e)))
}

pub fn parse_decimal(column: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Corrupt(format!("{} '{}': {}", column, value, e)))
}

/// Parses a stored enum tag through the domain type's `FromStr`.
pub fn parse_tag<T: FromStr>(column: &str, value: &str) -> Result<T, StorageError> {
    value
        .parse::<T>()
        .map_err(|_| StorageError::Corrupt(format!("{} '{}'", column, value)))
}
