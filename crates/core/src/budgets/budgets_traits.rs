use async_trait::async_trait;
use chrono::NaiveDate;

use crate::budgets::budgets_model::{
    Budget, BudgetCategory, BudgetCategoryUpdate, BudgetStatus, BudgetUpdate,
    BudgetWithCategories, CategoryStatus, NewBudget, NewBudgetCategory, RolloverOutcome,
    RolloverPlan,
};
use crate::errors::Result;
use crate::expenses::ExpenseCategory;

/// Trait for budget repository operations.
///
/// Reads are owner-scoped and return `None` for records owned by someone
/// else. Writes re-check the allocation invariants inside their transaction.
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<Option<Budget>>;
    fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>>;
    fn get_categories(&self, budget_id: &str) -> Result<Vec<BudgetCategory>>;
    fn get_categories_for_budgets(&self, budget_ids: &[String]) -> Result<Vec<BudgetCategory>>;

    /// Looks up a category limit together with its parent budget.
    fn get_category(&self, owner: &str, category_id: &str)
        -> Result<Option<(Budget, BudgetCategory)>>;

    /// Category limits for `category` whose budget starts on or before `date`.
    /// Callers still need to check the budget's active window.
    fn find_categories_for_expense(
        &self,
        owner: &str,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Result<Vec<(Budget, BudgetCategory)>>;

    async fn insert_budget(&self, owner: String, new_budget: NewBudget)
        -> Result<BudgetWithCategories>;
    async fn update_budget(
        &self,
        owner: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget>;
    async fn delete_budget(&self, owner: String, budget_id: String) -> Result<usize>;

    async fn insert_category(
        &self,
        owner: String,
        budget_id: String,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory>;
    async fn update_category(
        &self,
        owner: String,
        category_id: String,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory>;
    async fn delete_category(&self, owner: String, category_id: String) -> Result<usize>;

    /// Creates the successor generation, its categories and reset
    /// notifications in one transaction. Returns the existing successor
    /// when the source budget was already rolled over.
    async fn apply_rollover(&self, plan: RolloverPlan) -> Result<RolloverOutcome>;
}

/// Trait for budget service operations.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    fn list_budgets(&self, owner: &str) -> Result<Vec<BudgetWithCategories>>;
    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<BudgetWithCategories>;
    async fn create_budget(&self, owner: &str, new_budget: NewBudget)
        -> Result<BudgetWithCategories>;
    async fn update_budget(
        &self,
        owner: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<BudgetWithCategories>;
    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<()>;

    fn list_categories(&self, owner: &str, budget_id: &str) -> Result<Vec<BudgetCategory>>;
    fn get_category(&self, owner: &str, category_id: &str) -> Result<BudgetCategory>;
    async fn add_category(
        &self,
        owner: &str,
        budget_id: &str,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory>;
    async fn update_category(
        &self,
        owner: &str,
        category_id: &str,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory>;
    async fn delete_category(&self, owner: &str, category_id: &str) -> Result<()>;

    fn budget_status(&self, owner: &str, budget_id: &str) -> Result<BudgetStatus>;
    fn category_status(&self, owner: &str, category_id: &str) -> Result<CategoryStatus>;

    async fn rollover(&self, owner: &str, budget_id: &str) -> Result<BudgetWithCategories>;
}
