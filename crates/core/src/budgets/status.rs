//! Spend/remaining/percentage derivation for budgets and category limits.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::budgets::budgets_model::{Budget, BudgetCategory, BudgetStatus, CategoryStatus};
use crate::errors::Result;
use crate::expenses::ExpenseRepositoryTrait;
use crate::utils::decimal_utils::{checked_add, checked_mul};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `spent / limit * 100` rounded to cents, or zero when nothing was spent.
///
/// The rounded value is for display. Threshold and limit checks compare the
/// unrounded amounts.
pub fn percentage_used(spent: Decimal, limit: Decimal) -> Result<Decimal> {
    if spent <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    Ok(checked_mul(spent, HUNDRED)?
        .checked_div(limit)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2))
}

/// `spent / limit * 100 >= threshold` without dividing or rounding.
fn threshold_reached(spent: Decimal, limit: Decimal, threshold: Decimal) -> Result<bool> {
    if spent <= Decimal::ZERO {
        return Ok(false);
    }
    Ok(checked_mul(spent, HUNDRED)? >= checked_mul(threshold, limit)?)
}

impl BudgetStatus {
    pub fn from_spent(total_limit: Decimal, total_spent: Decimal) -> Result<Self> {
        Ok(BudgetStatus {
            total_limit,
            total_spent,
            remaining: total_limit - total_spent,
            percentage_used: percentage_used(total_spent, total_limit)?,
        })
    }
}

impl CategoryStatus {
    pub fn from_spent(category: &BudgetCategory, spent: Decimal) -> Result<Self> {
        Ok(CategoryStatus {
            limit: category.limit,
            spent,
            remaining: category.limit - spent,
            percentage_used: percentage_used(spent, category.limit)?,
            alert_triggered: threshold_reached(spent, category.limit, category.alert_threshold)?,
        })
    }

    pub fn limit_exceeded(&self) -> bool {
        self.spent > Decimal::ZERO && self.spent >= self.limit
    }
}

/// Reads expense totals for a budget's active window. Never writes.
pub struct BudgetStatusCalculator {
    expenses: Arc<dyn ExpenseRepositoryTrait>,
}

impl BudgetStatusCalculator {
    pub fn new(expenses: Arc<dyn ExpenseRepositoryTrait>) -> Self {
        BudgetStatusCalculator { expenses }
    }

    /// Status for one category limit of `budget`.
    pub fn category_status(
        &self,
        budget: &Budget,
        category: &BudgetCategory,
    ) -> Result<CategoryStatus> {
        let window = budget.active_window()?;
        let spent = self
            .expenses
            .sum_amount(&budget.owner, Some(category.category), &window)?;
        CategoryStatus::from_spent(category, spent)
    }

    /// Status for the whole budget, counting only the categories it tracks.
    pub fn budget_status(
        &self,
        budget: &Budget,
        categories: &[BudgetCategory],
    ) -> Result<BudgetStatus> {
        let window = budget.active_window()?;
        let mut total_spent = Decimal::ZERO;
        for category in categories {
            let spent = self
                .expenses
                .sum_amount(&budget.owner, Some(category.category), &window)?;
            total_spent = checked_add(total_spent, spent)?;
        }
        BudgetStatus::from_spent(budget.total_limit, total_spent)
    }
}
