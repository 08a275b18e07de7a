//! SQLite storage implementation for budgets and category limits.

mod model;
mod repository;


pub use model::{BudgetCategoryDB, BudgetDB};
pub use repository::BudgetRepository;
