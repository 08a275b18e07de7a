use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::expenses::expenses_model::{Expense, ExpenseCategory, ExpenseFilter, ExpenseUpdate, NewExpense};
use crate::utils::time_utils::DateWindow;

/// Trait for expense repository operations.
///
/// Every query is scoped to an owner; a record belonging to someone else
/// behaves exactly like a missing record.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    fn get_expense(&self, owner: &str, expense_id: &str) -> Result<Option<Expense>>;

    /// Lists expenses with `from <= date < until`, newest first.
    fn list_expenses(
        &self,
        owner: &str,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<Expense>>;

    /// Sum of amounts for the owner within `window`, optionally restricted to one category.
    fn sum_amount(
        &self,
        owner: &str,
        category: Option<ExpenseCategory>,
        window: &DateWindow,
    ) -> Result<Decimal>;

    async fn insert_expense(&self, owner: String, new_expense: NewExpense) -> Result<Expense>;
    async fn update_expense(
        &self,
        owner: String,
        expense_id: String,
        update: ExpenseUpdate,
    ) -> Result<Expense>;
    async fn delete_expense(&self, owner: String, expense_id: String) -> Result<usize>;
}

/// Trait for expense service operations.
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    fn get_expense(&self, owner: &str, expense_id: &str) -> Result<Expense>;
    fn list_expenses(&self, owner: &str, filter: Option<ExpenseFilter>) -> Result<Vec<Expense>>;
    async fn create_expense(&self, owner: &str, new_expense: NewExpense) -> Result<Expense>;
    async fn update_expense(
        &self,
        owner: &str,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense>;
    async fn delete_expense(&self, owner: &str, expense_id: &str) -> Result<()>;
}
