//! Budget domain models and period arithmetic.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BUDGET_NAME_MAX_LEN, DEFAULT_ALERT_THRESHOLD, MAX_ALERT_THRESHOLD, MIN_ALERT_THRESHOLD,
};
use crate::errors::{Error, Result, ValidationError};
use crate::expenses::ExpenseCategory;
use crate::utils::decimal_utils::{checked_sum, validate_amount};
use crate::utils::time_utils::{add_days, add_months, DateWindow};

/// Recurring cadence over which a budget's total limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "WEEKLY",
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Quarterly => "QUARTERLY",
            BudgetPeriod::Annually => "ANNUALLY",
        }
    }

    /// Returns the first day after a period starting at `start`.
    ///
    /// Month-based periods use calendar arithmetic, so a period starting on
    /// Jan 31 ends on the last day of February.
    pub fn advance(&self, start: NaiveDate) -> Result<NaiveDate> {
        match self {
            BudgetPeriod::Weekly => add_days(start, 7),
            BudgetPeriod::Monthly => add_months(start, 1),
            BudgetPeriod::Quarterly => add_months(start, 3),
            BudgetPeriod::Annually => add_months(start, 12),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WEEKLY" => Ok(BudgetPeriod::Weekly),
            "MONTHLY" => Ok(BudgetPeriod::Monthly),
            "QUARTERLY" => Ok(BudgetPeriod::Quarterly),
            "ANNUALLY" => Ok(BudgetPeriod::Annually),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown budget period '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Domain model representing one generation of a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub total_limit: Decimal,
    pub rollover_enabled: bool,
    /// Predecessor generation when this budget was created by rollover.
    pub rolled_over_from: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    pub fn end_date(&self) -> Result<NaiveDate> {
        self.period.advance(self.start_date)
    }

    pub fn next_period_start(&self) -> Result<NaiveDate> {
        self.end_date()
    }

    /// The `[start_date, end_date)` window expenses are counted in.
    pub fn active_window(&self) -> Result<DateWindow> {
        Ok(DateWindow::new(self.start_date, self.end_date()?))
    }
}

/// Per-category sub-limit within a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub budget_id: String,
    pub category: ExpenseCategory,
    pub limit: Decimal,
    pub alert_threshold: Decimal,
    pub notification_enabled: bool,
    /// Set when rollover had to clamp the carried limit.
    pub needs_review: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_alert_threshold() -> Decimal {
    DEFAULT_ALERT_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// Input model for adding a category limit to a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetCategory {
    pub category: ExpenseCategory,
    pub limit: Decimal,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: Decimal,
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
}

impl NewBudgetCategory {
    pub fn new(category: ExpenseCategory, limit: Decimal) -> Self {
        NewBudgetCategory {
            category,
            limit,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            notification_enabled: true,
        }
    }

    /// Field-level checks plus `limit <= total_limit`.
    pub fn validate(&self, total_limit: Decimal) -> Result<()> {
        validate_amount("limit", self.limit)?;
        validate_alert_threshold(self.alert_threshold)?;
        validate_category_limit(self.limit, total_limit)
    }
}

/// Editable fields of a category limit. The category itself is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategoryUpdate {
    pub limit: Decimal,
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: Decimal,
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
}

impl BudgetCategoryUpdate {
    /// Field checks only. The limit is checked against its budget with
    /// [`validate_reallocation`].
    pub fn validate(&self) -> Result<()> {
        validate_amount("limit", self.limit)?;
        validate_alert_threshold(self.alert_threshold)
    }
}

/// Input model for creating a budget, optionally with its category limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub total_limit: Decimal,
    #[serde(default)]
    pub rollover_enabled: bool,
    #[serde(default)]
    pub categories: Vec<NewBudgetCategory>,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_amount("totalLimit", self.total_limit)?;

        let mut seen = HashSet::new();
        for category in &self.categories {
            category.validate(self.total_limit)?;
            if !seen.insert(category.category) {
                return Err(ValidationError::DuplicateCategory(
                    category.category.as_str().to_string(),
                )
                .into());
            }
        }
        validate_allocation(self.total_limit, self.categories.iter().map(|c| c.limit))
    }
}

/// Editable fields of a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    pub name: String,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub total_limit: Decimal,
    pub rollover_enabled: bool,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_amount("totalLimit", self.total_limit)
    }
}

/// A budget together with its category limits, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithCategories {
    #[serde(flatten)]
    pub budget: Budget,
    pub categories: Vec<BudgetCategory>,
}

/// Spend summary for a whole budget generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: Decimal,
}

/// Spend summary for one category limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatus {
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_used: Decimal,
    pub alert_triggered: bool,
}

/// Category limit to be created in the successor generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriedCategory {
    pub category: ExpenseCategory,
    pub limit: Decimal,
    pub alert_threshold: Decimal,
    pub notification_enabled: bool,
    pub needs_review: bool,
    /// Message for the BUDGET_RESET notification, `None` when notifications are off.
    pub reset_message: Option<String>,
}

/// Everything the repository needs to create a successor generation atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloverPlan {
    pub source_budget_id: String,
    pub owner: String,
    pub name: String,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub total_limit: Decimal,
    pub rollover_enabled: bool,
    pub categories: Vec<CarriedCategory>,
}

/// Result of persisting a rollover. `created` is false when a successor
/// already existed and was returned instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloverOutcome {
    pub budget: BudgetWithCategories,
    pub created: bool,
}

// === Validation helpers, shared with the storage layer's in-transaction checks ===

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    if trimmed.chars().count() > BUDGET_NAME_MAX_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "Budget name cannot exceed {} characters",
            BUDGET_NAME_MAX_LEN
        ))
        .into());
    }
    Ok(())
}

pub fn validate_alert_threshold(threshold: Decimal) -> Result<()> {
    if threshold < MIN_ALERT_THRESHOLD || threshold > MAX_ALERT_THRESHOLD {
        return Err(ValidationError::InvalidInput(format!(
            "Alert threshold must be between {} and {}",
            MIN_ALERT_THRESHOLD, MAX_ALERT_THRESHOLD
        ))
        .into());
    }
    Ok(())
}

pub fn validate_category_limit(limit: Decimal, total_limit: Decimal) -> Result<()> {
    if limit > total_limit {
        return Err(ValidationError::CategoryLimitExceedsTotal { limit, total_limit }.into());
    }
    Ok(())
}

/// Checks `total_limit >= sum(limits)`.
pub fn validate_allocation(
    total_limit: Decimal,
    limits: impl IntoIterator<Item = Decimal>,
) -> Result<()> {
    let allocated = checked_sum(limits)?;
    if allocated > total_limit {
        return Err(ValidationError::TotalBelowAllocated {
            total_limit,
            allocated,
        }
        .into());
    }
    Ok(())
}

/// Checks a category limit change against the budget total.
///
/// Keeping or lowering a limit always passes: a rollover successor can carry
/// limits that already add up to more than its total, and lowering one of
/// them must stay possible.
pub fn validate_reallocation(
    total_limit: Decimal,
    current_limit: Decimal,
    new_limit: Decimal,
    sibling_limits: impl IntoIterator<Item = Decimal>,
) -> Result<()> {
    if new_limit <= current_limit {
        return Ok(());
    }
    validate_category_limit(new_limit, total_limit)?;
    validate_allocation(
        total_limit,
        sibling_limits.into_iter().chain(std::iter::once(new_limit)),
    )
}
