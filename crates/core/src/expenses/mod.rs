//! Expenses module - domain models, services, and traits.

mod expenses_model;
mod expenses_service;
mod expenses_traits;

#[cfg(test)]
mod expenses_service_tests;

pub use expenses_model::{
    Expense, ExpenseCategory, ExpenseFilter, ExpenseUpdate, NewExpense, PaymentMethod,
};
pub use expenses_service::ExpenseService;
pub use expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
