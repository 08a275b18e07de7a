//! SQLite storage implementation for income records.

mod model;
mod repository;

pub use model::IncomeDB;
pub use repository::IncomeRepository;
