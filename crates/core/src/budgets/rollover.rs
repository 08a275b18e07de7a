//! Planning of the next budget generation.
//!
//! Planning is pure: it turns the current generation and its category
//! statuses into a [`RolloverPlan`]. Persisting the plan (including the
//! reset notifications) happens in a single repository transaction.

use rust_decimal::Decimal;

use crate::budgets::budgets_errors::BudgetError;
use crate::budgets::budgets_model::{
    Budget, BudgetCategory, CarriedCategory, CategoryStatus, RolloverPlan,
};
use crate::constants::ROLLOVER_MIN_LIMIT;
use crate::errors::Result;

/// Carried limit for the next generation: `limit + remaining`, never below
/// [`ROLLOVER_MIN_LIMIT`]. The flag reports whether clamping happened.
pub fn carried_limit(limit: Decimal, remaining: Decimal) -> (Decimal, bool) {
    let carried = limit + remaining;
    if carried < ROLLOVER_MIN_LIMIT {
        (ROLLOVER_MIN_LIMIT, true)
    } else {
        (carried, false)
    }
}

fn reset_message(budget: &Budget, carried: &CarriedCategory, previous: Decimal) -> String {
    let mut message = format!(
        "{} budget reset for {}: new limit {} (previous limit {}).",
        carried.category.label(),
        budget.name,
        carried.limit,
        previous
    );
    if carried.needs_review {
        message.push_str(" Overspending exhausted the carried amount, please review this limit.");
    }
    message
}

pub fn plan_rollover(
    budget: &Budget,
    categories: &[(BudgetCategory, CategoryStatus)],
) -> Result<RolloverPlan> {
    if !budget.rollover_enabled {
        return Err(BudgetError::RolloverDisabled(budget.id.clone()).into());
    }

    let start_date = budget.next_period_start()?;
    let carried = categories
        .iter()
        .map(|(category, status)| {
            let (limit, needs_review) = carried_limit(category.limit, status.remaining);
            let mut carried = CarriedCategory {
                category: category.category,
                limit,
                alert_threshold: category.alert_threshold,
                notification_enabled: category.notification_enabled,
                needs_review,
                reset_message: None,
            };
            if carried.notification_enabled {
                carried.reset_message = Some(reset_message(budget, &carried, category.limit));
            }
            carried
        })
        .collect();

    Ok(RolloverPlan {
        source_budget_id: budget.id.clone(),
        owner: budget.owner.clone(),
        name: budget.name.clone(),
        period: budget.period,
        start_date,
        total_limit: budget.total_limit,
        rollover_enabled: budget.rollover_enabled,
        categories: carried,
    })
}
