use async_trait::async_trait;

use crate::errors::Result;
use crate::expenses::ExpenseCategory;
use crate::notifications::notifications_model::{BudgetNotification, NewBudgetNotification};
use chrono::NaiveDate;

/// Trait for notification repository operations.
///
/// Ownership follows the notification's category limit to its budget.
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list_notifications(&self, owner: &str, unread_only: bool)
        -> Result<Vec<BudgetNotification>>;

    /// Inserts unless a notification with the same dedup key exists.
    /// Returns `None` when the key was already taken.
    async fn insert_if_absent(
        &self,
        notification: NewBudgetNotification,
    ) -> Result<Option<BudgetNotification>>;

    /// Clears the given dedup keys so the next crossing notifies again.
    /// Existing notifications are kept. Returns how many were released.
    async fn release_dedup_keys(&self, keys: Vec<String>) -> Result<usize>;

    async fn set_read(&self, owner: String, notification_id: String, read: bool) -> Result<usize>;
    async fn mark_all_read(&self, owner: String) -> Result<usize>;
}

#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    fn list_notifications(&self, owner: &str, unread_only: bool)
        -> Result<Vec<BudgetNotification>>;
    async fn mark_read(&self, owner: &str, notification_id: &str) -> Result<()>;
    async fn mark_unread(&self, owner: &str, notification_id: &str) -> Result<()>;
    async fn mark_all_read(&self, owner: &str) -> Result<usize>;
}

/// Evaluates category limits after spending or limits change and records
/// threshold and limit alerts.
#[async_trait]
pub trait BudgetAlertServiceTrait: Send + Sync {
    async fn evaluate_expense_change(
        &self,
        owner: &str,
        categories: &[ExpenseCategory],
        dates: &[NaiveDate],
    ) -> Result<Vec<BudgetNotification>>;

    async fn evaluate_budget(&self, owner: &str, budget_id: &str)
        -> Result<Vec<BudgetNotification>>;
}
