//! Coalesces a batch of domain events into alert evaluation jobs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use spendwise_core::events::DomainEvent;
use spendwise_core::expenses::ExpenseCategory;

/// Expense changes for one owner, merged across events.
#[derive(Debug, Default, PartialEq)]
pub struct ExpenseAlertJob {
    pub categories: Vec<ExpenseCategory>,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Default, PartialEq)]
pub struct AlertPlan {
    pub expense_jobs: BTreeMap<String, ExpenseAlertJob>,
    /// `(owner, budget_id)` pairs whose limits changed.
    pub budget_jobs: BTreeSet<(String, String)>,
}

impl AlertPlan {
    pub fn is_empty(&self) -> bool {
        self.expense_jobs.is_empty() && self.budget_jobs.is_empty()
    }
}

pub fn plan_alert_jobs(events: &[DomainEvent]) -> AlertPlan {
    let mut merged: BTreeMap<String, (BTreeSet<ExpenseCategory>, BTreeSet<NaiveDate>)> =
        BTreeMap::new();
    let mut budget_jobs = BTreeSet::new();

    for event in events {
        match event {
            DomainEvent::ExpensesChanged {
                owner,
                categories,
                dates,
            } => {
                let entry = merged.entry(owner.clone()).or_default();
                entry.0.extend(categories.iter().copied());
                entry.1.extend(dates.iter().copied());
            }
            DomainEvent::BudgetChanged { owner, budget_id } => {
                budget_jobs.insert((owner.clone(), budget_id.clone()));
            }
        }
    }

    let expense_jobs = merged
        .into_iter()
        .map(|(owner, (categories, dates))| {
            (
                owner,
                ExpenseAlertJob {
                    categories: categories.into_iter().collect(),
                    dates: dates.into_iter().collect(),
                },
            )
        })
        .collect();

    AlertPlan {
        expense_jobs,
        budget_jobs,
    }
}
