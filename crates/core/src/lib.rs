//! Spendwise Core - Domain entities, services, and traits.
//!
//! This crate contains the budgeting, expense and income business logic.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod budgets;
pub mod constants;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod income;
pub mod notifications;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
