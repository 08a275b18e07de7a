use async_trait::async_trait;

use crate::errors::Result;
use crate::income::income_model::{
    Income, IncomeQuery, IncomeTypeSummary, IncomeUpdate, MonthlyIncome, NewIncome,
};
use chrono::NaiveDate;

/// Trait for income repository operations.
#[async_trait]
pub trait IncomeRepositoryTrait: Send + Sync {
    fn get_income(&self, owner: &str, income_id: &str) -> Result<Option<Income>>;
    fn list_incomes(&self, owner: &str, query: &IncomeQuery) -> Result<Vec<Income>>;
    async fn insert_income(&self, owner: String, new_income: NewIncome) -> Result<Income>;
    async fn update_income(
        &self,
        owner: String,
        income_id: String,
        update: IncomeUpdate,
    ) -> Result<Income>;
    async fn delete_income(&self, owner: String, income_id: String) -> Result<usize>;
}

/// Trait for income service operations.
#[async_trait]
pub trait IncomeServiceTrait: Send + Sync {
    fn get_income(&self, owner: &str, income_id: &str) -> Result<Income>;
    fn list_incomes(&self, owner: &str, query: &IncomeQuery) -> Result<Vec<Income>>;
    async fn create_income(&self, owner: &str, new_income: NewIncome) -> Result<Income>;
    async fn update_income(
        &self,
        owner: &str,
        income_id: &str,
        update: IncomeUpdate,
    ) -> Result<Income>;
    async fn delete_income(&self, owner: &str, income_id: &str) -> Result<()>;

    /// Per-type totals for `start..=end`, largest total first.
    fn summary_by_type(
        &self,
        owner: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IncomeTypeSummary>>;

    /// `summary_by_type` over the last `period_months` months up to today.
    fn analytics(&self, owner: &str, period_months: u32) -> Result<Vec<IncomeTypeSummary>>;

    fn monthly_summary(&self, owner: &str, months: u32) -> Result<Vec<MonthlyIncome>>;
    fn recurring_incomes(&self, owner: &str) -> Result<Vec<Income>>;
}
