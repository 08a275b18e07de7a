//! Budgets module - budget generations, category limits, status and rollover.

mod budgets_errors;
mod budgets_model;
mod budgets_service;
mod budgets_traits;
mod rollover;
mod status;


pub use budgets_errors::BudgetError;
pub use budgets_model::{
    validate_alert_threshold, validate_allocation, validate_category_limit,
    validate_name, validate_reallocation, Budget, BudgetCategory, BudgetCategoryUpdate, BudgetPeriod, BudgetStatus,
    BudgetUpdate, BudgetWithCategories, CarriedCategory, CategoryStatus, NewBudget,
    NewBudgetCategory, RolloverOutcome, RolloverPlan,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
pub use rollover::{carried_limit, plan_rollover};
pub use status::{percentage_used, BudgetStatusCalculator};
