//! Domain event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::expenses::ExpenseCategory;

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into follow-up work (budget alert evaluation).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Expenses were created, updated, or deleted.
    ExpensesChanged {
        owner: String,
        categories: Vec<ExpenseCategory>,
        /// Dates touched by the mutation (old and new dates on update)
        dates: Vec<NaiveDate>,
    },

    /// A budget or one of its categories was created or updated.
    BudgetChanged { owner: String, budget_id: String },
}

impl DomainEvent {
    /// Creates an ExpensesChanged event.
    pub fn expenses_changed(
        owner: impl Into<String>,
        categories: Vec<ExpenseCategory>,
        dates: Vec<NaiveDate>,
    ) -> Self {
        Self::ExpensesChanged {
            owner: owner.into(),
            categories,
            dates,
        }
    }

    /// Creates a BudgetChanged event.
    pub fn budget_changed(owner: impl Into<String>, budget_id: impl Into<String>) -> Self {
        Self::BudgetChanged {
            owner: owner.into(),
            budget_id: budget_id.into(),
        }
    }
}
