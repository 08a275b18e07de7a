//! Write-path alert evaluation.
//!
//! Runs after expenses or limits change, never from status reads. Each
//! (category limit, notification type) pair is reported once per crossing:
//! when the category is next evaluated below the mark, the pair is re-armed.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};

use crate::budgets::{
    Budget, BudgetCategory, BudgetRepositoryTrait, BudgetStatusCalculator, CategoryStatus,
};
use crate::errors::Result;
use crate::expenses::{ExpenseCategory, ExpenseRepositoryTrait};
use crate::notifications::notifications_model::{
    released_keys, BudgetNotification, NewBudgetNotification, NotificationType,
};
use crate::notifications::notifications_traits::{
    BudgetAlertServiceTrait, NotificationRepositoryTrait,
};

/// Alerts a category's current status calls for, before deduplication.
pub fn pending_alerts(
    budget: &Budget,
    category: &BudgetCategory,
    status: &CategoryStatus,
) -> Vec<NewBudgetNotification> {
    if !category.notification_enabled {
        return Vec::new();
    }

    let mut alerts = Vec::new();
    if status.alert_triggered {
        alerts.push(NewBudgetNotification::new(
            &category.id,
            NotificationType::ThresholdReached,
            format!(
                "{} spending in {} reached {}% of its {} limit.",
                category.category.label(),
                budget.name,
                status.percentage_used,
                category.limit
            ),
        ));
    }
    if status.limit_exceeded() {
        alerts.push(NewBudgetNotification::new(
            &category.id,
            NotificationType::LimitExceeded,
            format!(
                "{} spending in {} is {} over its {} limit.",
                category.category.label(),
                budget.name,
                -status.remaining,
                category.limit
            ),
        ));
    }
    alerts
}

/// Notification types whose condition no longer holds for `status`.
pub fn cleared_alerts(status: &CategoryStatus) -> Vec<NotificationType> {
    let mut cleared = Vec::new();
    if !status.alert_triggered {
        cleared.push(NotificationType::ThresholdReached);
    }
    if !status.limit_exceeded() {
        cleared.push(NotificationType::LimitExceeded);
    }
    cleared
}

pub struct BudgetAlertService {
    budgets: Arc<dyn BudgetRepositoryTrait>,
    notifications: Arc<dyn NotificationRepositoryTrait>,
    calculator: BudgetStatusCalculator,
}

impl BudgetAlertService {
    pub fn new(
        budgets: Arc<dyn BudgetRepositoryTrait>,
        expenses: Arc<dyn ExpenseRepositoryTrait>,
        notifications: Arc<dyn NotificationRepositoryTrait>,
    ) -> Self {
        BudgetAlertService {
            budgets,
            notifications,
            calculator: BudgetStatusCalculator::new(expenses),
        }
    }

    async fn evaluate(
        &self,
        targets: Vec<(Budget, BudgetCategory)>,
    ) -> Result<Vec<BudgetNotification>> {
        let mut created = Vec::new();
        for (budget, category) in targets {
            if !category.notification_enabled {
                continue;
            }
            let status = self.calculator.category_status(&budget, &category)?;
            let cleared = cleared_alerts(&status);
            if !cleared.is_empty() {
                let released = self
                    .notifications
                    .release_dedup_keys(released_keys(&category.id, &cleared))
                    .await?;
                if released > 0 {
                    debug!("Re-armed {} alert(s) for category {}", released, category.id);
                }
            }
            for alert in pending_alerts(&budget, &category, &status) {
                if let Some(notification) = self.notifications.insert_if_absent(alert).await? {
                    info!(
                        "{} for category {} of budget {}",
                        notification.notification_type, category.id, budget.id
                    );
                    created.push(notification);
                }
            }
        }
        Ok(created)
    }
}

#[async_trait]
impl BudgetAlertServiceTrait for BudgetAlertService {
    async fn evaluate_expense_change(
        &self,
        owner: &str,
        categories: &[ExpenseCategory],
        dates: &[NaiveDate],
    ) -> Result<Vec<BudgetNotification>> {
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for category in categories {
            for date in dates {
                for (budget, budget_category) in
                    self.budgets
                        .find_categories_for_expense(owner, *category, *date)?
                {
                    if !budget.active_window()?.contains(*date) {
                        continue;
                    }
                    if seen.insert(budget_category.id.clone()) {
                        targets.push((budget, budget_category));
                    }
                }
            }
        }
        debug!(
            "Evaluating {} category limit(s) after expense change for {}",
            targets.len(),
            owner
        );
        self.evaluate(targets).await
    }

    async fn evaluate_budget(
        &self,
        owner: &str,
        budget_id: &str,
    ) -> Result<Vec<BudgetNotification>> {
        let Some(budget) = self.budgets.get_budget(owner, budget_id)? else {
            debug!("Budget {} disappeared before alert evaluation", budget_id);
            return Ok(Vec::new());
        };
        let targets = self
            .budgets
            .get_categories(&budget.id)?
            .into_iter()
            .map(|category| (budget.clone(), category))
            .collect();
        self.evaluate(targets).await
    }
}
