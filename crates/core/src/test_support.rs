//! In-memory repositories shared by the service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::budgets::{
    validate_allocation, validate_category_limit, Budget, BudgetCategory, BudgetCategoryUpdate,
    BudgetRepositoryTrait, BudgetUpdate, BudgetWithCategories, NewBudget, NewBudgetCategory,
    RolloverOutcome, RolloverPlan,
};
use crate::errors::{DatabaseError, Result};
use crate::expenses::{Expense, ExpenseCategory, ExpenseRepositoryTrait, ExpenseUpdate, NewExpense};
use crate::income::{
    next_expected_date, Income, IncomeOrdering, IncomeQuery, IncomeRepositoryTrait, IncomeUpdate,
    NewIncome,
};
use crate::notifications::{
    BudgetNotification, NewBudgetNotification, NotificationRepositoryTrait, NotificationType,
};
use crate::utils::decimal_utils::checked_sum;
use crate::utils::time_utils::DateWindow;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

struct StoredNotification {
    notification: BudgetNotification,
    dedup_key: Option<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    budgets: Mutex<Vec<Budget>>,
    categories: Mutex<Vec<BudgetCategory>>,
    expenses: Mutex<Vec<Expense>>,
    incomes: Mutex<Vec<Income>>,
    notifications: Mutex<Vec<StoredNotification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn budget_count(&self) -> usize {
        self.budgets.lock().unwrap().len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.lock().unwrap().len()
    }

    pub fn notifications_of_type(&self, notification_type: NotificationType) -> Vec<BudgetNotification> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.notification.clone())
            .filter(|n| n.notification_type == notification_type)
            .collect()
    }

    /// Inserts an expense directly, skipping validation.
    pub fn seed_expense(
        &self,
        owner: &str,
        category: ExpenseCategory,
        amount: Decimal,
        date: NaiveDate,
    ) -> Expense {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            amount,
            category,
            description: None,
            date,
            payment_method: crate::expenses::PaymentMethod::Cash,
            created_at: now(),
            updated_at: now(),
        };
        self.expenses.lock().unwrap().push(expense.clone());
        expense
    }

    fn owner_of_category(&self, category_id: &str) -> Option<String> {
        let budget_id = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.budget_id.clone())?;
        self.budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == budget_id)
            .map(|b| b.owner.clone())
    }

    fn push_notification(&self, new: NewBudgetNotification) -> Option<BudgetNotification> {
        let mut notifications = self.notifications.lock().unwrap();
        if notifications
            .iter()
            .any(|n| n.dedup_key.as_deref() == Some(new.dedup_key.as_str()))
        {
            return None;
        }
        let notification = BudgetNotification {
            id: Uuid::new_v4().to_string(),
            budget_category_id: new.budget_category_id,
            notification_type: new.notification_type,
            message: new.message,
            read: false,
            created_at: now(),
        };
        notifications.push(StoredNotification {
            notification: notification.clone(),
            dedup_key: Some(new.dedup_key),
        });
        Some(notification)
    }

    fn new_category(budget_id: &str, new_category: NewBudgetCategory) -> BudgetCategory {
        BudgetCategory {
            id: Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            category: new_category.category,
            limit: new_category.limit,
            alert_threshold: new_category.alert_threshold,
            notification_enabled: new_category.notification_enabled,
            needs_review: false,
            created_at: now(),
            updated_at: now(),
        }
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for InMemoryStore {
    fn get_expense(&self, owner: &str, expense_id: &str) -> Result<Option<Expense>> {
        Ok(self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == expense_id && e.owner == owner)
            .cloned())
    }

    fn list_expenses(
        &self,
        owner: &str,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.owner == owner)
            .filter(|e| from.map_or(true, |from| e.date >= from))
            .filter(|e| until.map_or(true, |until| e.date < until))
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    fn sum_amount(
        &self,
        owner: &str,
        category: Option<ExpenseCategory>,
        window: &DateWindow,
    ) -> Result<Decimal> {
        let amounts: Vec<Decimal> = self
            .expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.owner == owner && window.contains(e.date))
            .filter(|e| category.map_or(true, |c| e.category == c))
            .map(|e| e.amount)
            .collect();
        checked_sum(amounts)
    }

    async fn insert_expense(&self, owner: String, new_expense: NewExpense) -> Result<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner,
            amount: new_expense.amount,
            category: new_expense.category,
            description: new_expense.description,
            date: new_expense.date,
            payment_method: new_expense.payment_method,
            created_at: now(),
            updated_at: now(),
        };
        self.expenses.lock().unwrap().push(expense.clone());
        Ok(expense)
    }

    async fn update_expense(
        &self,
        owner: String,
        expense_id: String,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        let mut expenses = self.expenses.lock().unwrap();
        let expense = expenses
            .iter_mut()
            .find(|e| e.id == expense_id && e.owner == owner)
            .ok_or_else(|| crate::Error::not_found("Expense"))?;
        expense.amount = update.amount;
        expense.category = update.category;
        expense.description = update.description;
        expense.date = update.date;
        expense.payment_method = update.payment_method;
        expense.updated_at = now();
        Ok(expense.clone())
    }

    async fn delete_expense(&self, owner: String, expense_id: String) -> Result<usize> {
        let mut expenses = self.expenses.lock().unwrap();
        let before = expenses.len();
        expenses.retain(|e| !(e.id == expense_id && e.owner == owner));
        Ok(before - expenses.len())
    }
}

#[async_trait]
impl BudgetRepositoryTrait for InMemoryStore {
    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<Option<Budget>> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == budget_id && b.owner == owner)
            .cloned())
    }

    fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.owner == owner)
            .cloned()
            .collect())
    }

    fn get_categories(&self, budget_id: &str) -> Result<Vec<BudgetCategory>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.budget_id == budget_id)
            .cloned()
            .collect())
    }

    fn get_categories_for_budgets(&self, budget_ids: &[String]) -> Result<Vec<BudgetCategory>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| budget_ids.contains(&c.budget_id))
            .cloned()
            .collect())
    }

    fn get_category(
        &self,
        owner: &str,
        category_id: &str,
    ) -> Result<Option<(Budget, BudgetCategory)>> {
        let category = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == category_id)
            .cloned();
        let Some(category) = category else {
            return Ok(None);
        };
        Ok(self
            .get_budget(owner, &category.budget_id)?
            .map(|budget| (budget, category)))
    }

    fn find_categories_for_expense(
        &self,
        owner: &str,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Result<Vec<(Budget, BudgetCategory)>> {
        let budgets: Vec<Budget> = self
            .list_budgets(owner)?
            .into_iter()
            .filter(|b| b.start_date <= date)
            .collect();
        let categories = self.categories.lock().unwrap();
        Ok(budgets
            .into_iter()
            .flat_map(|budget| {
                categories
                    .iter()
                    .filter(|c| c.budget_id == budget.id && c.category == category)
                    .map(|c| (budget.clone(), c.clone()))
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    async fn insert_budget(
        &self,
        owner: String,
        new_budget: NewBudget,
    ) -> Result<BudgetWithCategories> {
        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            owner,
            name: new_budget.name,
            period: new_budget.period,
            start_date: new_budget.start_date,
            total_limit: new_budget.total_limit,
            rollover_enabled: new_budget.rollover_enabled,
            rolled_over_from: None,
            created_at: now(),
            updated_at: now(),
        };
        let categories: Vec<BudgetCategory> = new_budget
            .categories
            .into_iter()
            .map(|c| Self::new_category(&budget.id, c))
            .collect();
        self.budgets.lock().unwrap().push(budget.clone());
        self.categories
            .lock()
            .unwrap()
            .extend(categories.iter().cloned());
        Ok(BudgetWithCategories { budget, categories })
    }

    async fn update_budget(
        &self,
        owner: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        let mut budgets = self.budgets.lock().unwrap();
        let budget = budgets
            .iter_mut()
            .find(|b| b.id == budget_id && b.owner == owner)
            .ok_or_else(|| crate::Error::not_found("Budget"))?;
        budget.name = update.name;
        budget.period = update.period;
        budget.start_date = update.start_date;
        budget.total_limit = update.total_limit;
        budget.rollover_enabled = update.rollover_enabled;
        budget.updated_at = now();
        Ok(budget.clone())
    }

    async fn delete_budget(&self, owner: String, budget_id: String) -> Result<usize> {
        let mut budgets = self.budgets.lock().unwrap();
        let before = budgets.len();
        budgets.retain(|b| !(b.id == budget_id && b.owner == owner));
        let deleted = before - budgets.len();
        if deleted > 0 {
            self.categories
                .lock()
                .unwrap()
                .retain(|c| c.budget_id != budget_id);
        }
        Ok(deleted)
    }

    async fn insert_category(
        &self,
        owner: String,
        budget_id: String,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory> {
        let budget = self
            .get_budget(&owner, &budget_id)?
            .ok_or_else(|| crate::Error::not_found("Budget"))?;
        let mut categories = self.categories.lock().unwrap();
        let siblings: Vec<&BudgetCategory> =
            categories.iter().filter(|c| c.budget_id == budget_id).collect();
        if siblings.iter().any(|c| c.category == new_category.category) {
            return Err(DatabaseError::UniqueViolation("budget_categories".to_string()).into());
        }
        validate_category_limit(new_category.limit, budget.total_limit)?;
        validate_allocation(
            budget.total_limit,
            siblings
                .iter()
                .map(|c| c.limit)
                .chain(std::iter::once(new_category.limit)),
        )?;
        let category = Self::new_category(&budget_id, new_category);
        categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        owner: String,
        category_id: String,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        if self.get_category(&owner, &category_id)?.is_none() {
            return Err(crate::Error::not_found("Budget category"));
        }
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| crate::Error::not_found("Budget category"))?;
        category.limit = update.limit;
        category.alert_threshold = update.alert_threshold;
        category.notification_enabled = update.notification_enabled;
        category.needs_review = false;
        category.updated_at = now();
        Ok(category.clone())
    }

    async fn delete_category(&self, owner: String, category_id: String) -> Result<usize> {
        if self.get_category(&owner, &category_id)?.is_none() {
            return Ok(0);
        }
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != category_id);
        Ok(before - categories.len())
    }

    async fn apply_rollover(&self, plan: RolloverPlan) -> Result<RolloverOutcome> {
        let existing = self
            .budgets
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.rolled_over_from.as_deref() == Some(plan.source_budget_id.as_str()))
            .cloned();
        if let Some(budget) = existing {
            let categories = self.get_categories(&budget.id)?;
            return Ok(RolloverOutcome {
                budget: BudgetWithCategories { budget, categories },
                created: false,
            });
        }

        let budget = Budget {
            id: Uuid::new_v4().to_string(),
            owner: plan.owner,
            name: plan.name,
            period: plan.period,
            start_date: plan.start_date,
            total_limit: plan.total_limit,
            rollover_enabled: plan.rollover_enabled,
            rolled_over_from: Some(plan.source_budget_id),
            created_at: now(),
            updated_at: now(),
        };
        let mut categories = Vec::with_capacity(plan.categories.len());
        let mut resets = Vec::new();
        for carried in plan.categories {
            let category = BudgetCategory {
                id: Uuid::new_v4().to_string(),
                budget_id: budget.id.clone(),
                category: carried.category,
                limit: carried.limit,
                alert_threshold: carried.alert_threshold,
                notification_enabled: carried.notification_enabled,
                needs_review: carried.needs_review,
                created_at: now(),
                updated_at: now(),
            };
            if let Some(message) = carried.reset_message {
                resets.push(NewBudgetNotification::new(
                    &category.id,
                    NotificationType::BudgetReset,
                    message,
                ));
            }
            categories.push(category);
        }

        self.budgets.lock().unwrap().push(budget.clone());
        self.categories
            .lock()
            .unwrap()
            .extend(categories.iter().cloned());
        for reset in resets {
            self.push_notification(reset);
        }
        Ok(RolloverOutcome {
            budget: BudgetWithCategories { budget, categories },
            created: true,
        })
    }
}

#[async_trait]
impl NotificationRepositoryTrait for InMemoryStore {
    fn list_notifications(
        &self,
        owner: &str,
        unread_only: bool,
    ) -> Result<Vec<BudgetNotification>> {
        let all: Vec<BudgetNotification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.notification.clone())
            .collect();
        let mut visible: Vec<BudgetNotification> = all
            .into_iter()
            .filter(|n| self.owner_of_category(&n.budget_category_id).as_deref() == Some(owner))
            .filter(|n| !unread_only || !n.read)
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn insert_if_absent(
        &self,
        notification: NewBudgetNotification,
    ) -> Result<Option<BudgetNotification>> {
        Ok(self.push_notification(notification))
    }

    async fn release_dedup_keys(&self, keys: Vec<String>) -> Result<usize> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut released = 0;
        for stored in notifications.iter_mut() {
            if stored.dedup_key.as_ref().map_or(false, |key| keys.contains(key)) {
                stored.dedup_key = None;
                released += 1;
            }
        }
        Ok(released)
    }

    async fn set_read(&self, owner: String, notification_id: String, read: bool) -> Result<usize> {
        let category_id = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| &n.notification)
            .find(|n| n.id == notification_id)
            .map(|n| n.budget_category_id.clone());
        let Some(category_id) = category_id else {
            return Ok(0);
        };
        if self.owner_of_category(&category_id).as_deref() != Some(owner.as_str()) {
            return Ok(0);
        }
        let mut notifications = self.notifications.lock().unwrap();
        let mut updated = 0;
        for stored in notifications.iter_mut() {
            if stored.notification.id == notification_id {
                stored.notification.read = read;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn mark_all_read(&self, owner: String) -> Result<usize> {
        let unread = self.list_notifications(&owner, true)?;
        let ids: Vec<String> = unread.into_iter().map(|n| n.id).collect();
        let mut notifications = self.notifications.lock().unwrap();
        for stored in notifications.iter_mut() {
            if ids.contains(&stored.notification.id) {
                stored.notification.read = true;
            }
        }
        Ok(ids.len())
    }
}

#[async_trait]
impl IncomeRepositoryTrait for InMemoryStore {
    fn get_income(&self, owner: &str, income_id: &str) -> Result<Option<Income>> {
        Ok(self
            .incomes
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == income_id && i.owner == owner)
            .cloned())
    }

    fn list_incomes(&self, owner: &str, query: &IncomeQuery) -> Result<Vec<Income>> {
        let mut incomes: Vec<Income> = self
            .incomes
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.owner == owner)
            .filter(|i| query.income_type.map_or(true, |t| i.income_type == t))
            .filter(|i| query.recurring.map_or(true, |r| i.recurring == r))
            .filter(|i| query.date.map_or(true, |d| i.date == d))
            .filter(|i| query.date_from.map_or(true, |d| i.date >= d))
            .filter(|i| query.date_to.map_or(true, |d| i.date <= d))
            .filter(|i| {
                query.search.as_ref().map_or(true, |s| {
                    i.description.to_lowercase().contains(&s.to_lowercase())
                })
            })
            .cloned()
            .collect();
        match query.ordering {
            IncomeOrdering::DateAsc => incomes.sort_by(|a, b| a.date.cmp(&b.date)),
            IncomeOrdering::DateDesc => incomes.sort_by(|a, b| b.date.cmp(&a.date)),
            IncomeOrdering::AmountAsc => incomes.sort_by(|a, b| a.amount.cmp(&b.amount)),
            IncomeOrdering::AmountDesc => incomes.sort_by(|a, b| b.amount.cmp(&a.amount)),
            IncomeOrdering::CreatedAtAsc => incomes.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            IncomeOrdering::CreatedAtDesc => {
                incomes.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
        }
        Ok(incomes)
    }

    async fn insert_income(&self, owner: String, new_income: NewIncome) -> Result<Income> {
        let income = Income {
            id: Uuid::new_v4().to_string(),
            owner,
            amount: new_income.amount,
            income_type: new_income.income_type,
            currency: new_income.currency,
            date: new_income.date,
            description: new_income.description,
            recurring: new_income.recurring,
            frequency: new_income.frequency,
            next_expected_date: next_expected_date(
                new_income.recurring,
                new_income.frequency,
                new_income.date,
            ),
            created_at: now(),
            updated_at: now(),
        };
        self.incomes.lock().unwrap().push(income.clone());
        Ok(income)
    }

    async fn update_income(
        &self,
        owner: String,
        income_id: String,
        update: IncomeUpdate,
    ) -> Result<Income> {
        let mut incomes = self.incomes.lock().unwrap();
        let income = incomes
            .iter_mut()
            .find(|i| i.id == income_id && i.owner == owner)
            .ok_or_else(|| crate::Error::not_found("Income"))?;
        income.amount = update.amount;
        income.income_type = update.income_type;
        income.currency = update.currency;
        income.date = update.date;
        income.description = update.description;
        income.recurring = update.recurring;
        income.frequency = update.frequency;
        income.next_expected_date =
            next_expected_date(update.recurring, update.frequency, update.date);
        income.updated_at = now();
        Ok(income.clone())
    }

    async fn delete_income(&self, owner: String, income_id: String) -> Result<usize> {
        let mut incomes = self.incomes.lock().unwrap();
        let before = incomes.len();
        incomes.retain(|i| !(i.id == income_id && i.owner == owner));
        Ok(before - incomes.len())
    }
}
