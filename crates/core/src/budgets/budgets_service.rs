use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::budgets::budgets_model::{
    validate_allocation, validate_category_limit, validate_reallocation, Budget, BudgetCategory,
    BudgetCategoryUpdate, BudgetStatus, BudgetUpdate, BudgetWithCategories, CategoryStatus,
    NewBudget, NewBudgetCategory,
};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::budgets::rollover::plan_rollover;
use crate::budgets::status::BudgetStatusCalculator;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink};
use crate::expenses::ExpenseRepositoryTrait;

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    calculator: BudgetStatusCalculator,
    event_sink: Arc<dyn DomainEventSink>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        BudgetService {
            repository,
            calculator: BudgetStatusCalculator::new(expense_repository),
            event_sink,
        }
    }

    fn load_budget(&self, owner: &str, budget_id: &str) -> Result<Budget> {
        self.repository
            .get_budget(owner, budget_id)?
            .ok_or_else(|| Error::not_found("Budget"))
    }

    fn load_category(
        &self,
        owner: &str,
        category_id: &str,
    ) -> Result<(Budget, BudgetCategory)> {
        self.repository
            .get_category(owner, category_id)?
            .ok_or_else(|| Error::not_found("Budget category"))
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    fn list_budgets(&self, owner: &str) -> Result<Vec<BudgetWithCategories>> {
        let budgets = self.repository.list_budgets(owner)?;
        let ids: Vec<String> = budgets.iter().map(|b| b.id.clone()).collect();

        let mut by_budget: HashMap<String, Vec<BudgetCategory>> = HashMap::new();
        for category in self.repository.get_categories_for_budgets(&ids)? {
            by_budget
                .entry(category.budget_id.clone())
                .or_default()
                .push(category);
        }

        Ok(budgets
            .into_iter()
            .map(|budget| {
                let categories = by_budget.remove(&budget.id).unwrap_or_default();
                BudgetWithCategories { budget, categories }
            })
            .collect())
    }

    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<BudgetWithCategories> {
        let budget = self.load_budget(owner, budget_id)?;
        let categories = self.repository.get_categories(&budget.id)?;
        Ok(BudgetWithCategories { budget, categories })
    }

    async fn create_budget(
        &self,
        owner: &str,
        new_budget: NewBudget,
    ) -> Result<BudgetWithCategories> {
        new_budget.validate()?;
        let created = self
            .repository
            .insert_budget(owner.to_string(), new_budget)
            .await?;
        debug!("Created budget {} for {}", created.budget.id, owner);

        self.event_sink
            .emit(DomainEvent::budget_changed(owner, &created.budget.id));
        Ok(created)
    }

    async fn update_budget(
        &self,
        owner: &str,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<BudgetWithCategories> {
        update.validate()?;
        let existing = self.get_budget(owner, budget_id)?;
        for category in &existing.categories {
            validate_category_limit(category.limit, update.total_limit)?;
        }
        validate_allocation(
            update.total_limit,
            existing.categories.iter().map(|c| c.limit),
        )?;

        let budget = self
            .repository
            .update_budget(owner.to_string(), budget_id.to_string(), update)
            .await?;
        self.event_sink
            .emit(DomainEvent::budget_changed(owner, &budget.id));
        Ok(BudgetWithCategories {
            budget,
            categories: existing.categories,
        })
    }

    async fn delete_budget(&self, owner: &str, budget_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_budget(owner.to_string(), budget_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Budget"));
        }
        debug!("Deleted budget {} for {}", budget_id, owner);
        Ok(())
    }

    fn list_categories(&self, owner: &str, budget_id: &str) -> Result<Vec<BudgetCategory>> {
        let budget = self.load_budget(owner, budget_id)?;
        self.repository.get_categories(&budget.id)
    }

    fn get_category(&self, owner: &str, category_id: &str) -> Result<BudgetCategory> {
        self.load_category(owner, category_id).map(|(_, category)| category)
    }

    async fn add_category(
        &self,
        owner: &str,
        budget_id: &str,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory> {
        let existing = self.get_budget(owner, budget_id)?;
        new_category.validate(existing.budget.total_limit)?;
        if existing
            .categories
            .iter()
            .any(|c| c.category == new_category.category)
        {
            return Err(ValidationError::DuplicateCategory(
                new_category.category.as_str().to_string(),
            )
            .into());
        }
        validate_allocation(
            existing.budget.total_limit,
            existing
                .categories
                .iter()
                .map(|c| c.limit)
                .chain(std::iter::once(new_category.limit)),
        )?;

        let category = self
            .repository
            .insert_category(owner.to_string(), budget_id.to_string(), new_category)
            .await?;
        self.event_sink
            .emit(DomainEvent::budget_changed(owner, budget_id));
        Ok(category)
    }

    async fn update_category(
        &self,
        owner: &str,
        category_id: &str,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        let (budget, current) = self.load_category(owner, category_id)?;
        update.validate()?;
        let siblings = self.repository.get_categories(&budget.id)?;
        validate_reallocation(
            budget.total_limit,
            current.limit,
            update.limit,
            siblings
                .iter()
                .filter(|c| c.id != current.id)
                .map(|c| c.limit),
        )?;

        let category = self
            .repository
            .update_category(owner.to_string(), category_id.to_string(), update)
            .await?;
        self.event_sink
            .emit(DomainEvent::budget_changed(owner, &budget.id));
        Ok(category)
    }

    async fn delete_category(&self, owner: &str, category_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_category(owner.to_string(), category_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Budget category"));
        }
        Ok(())
    }

    fn budget_status(&self, owner: &str, budget_id: &str) -> Result<BudgetStatus> {
        let existing = self.get_budget(owner, budget_id)?;
        self.calculator
            .budget_status(&existing.budget, &existing.categories)
    }

    fn category_status(&self, owner: &str, category_id: &str) -> Result<CategoryStatus> {
        let (budget, category) = self.load_category(owner, category_id)?;
        self.calculator.category_status(&budget, &category)
    }

    async fn rollover(&self, owner: &str, budget_id: &str) -> Result<BudgetWithCategories> {
        let existing = self.get_budget(owner, budget_id)?;

        let mut statuses = Vec::with_capacity(existing.categories.len());
        for category in &existing.categories {
            let status = self.calculator.category_status(&existing.budget, category)?;
            statuses.push((category.clone(), status));
        }
        let plan = plan_rollover(&existing.budget, &statuses)?;

        let outcome = self.repository.apply_rollover(plan).await?;
        if outcome.created {
            info!(
                "Rolled budget {} over into {} starting {}",
                budget_id, outcome.budget.budget.id, outcome.budget.budget.start_date
            );
            self.event_sink
                .emit(DomainEvent::budget_changed(owner, &outcome.budget.budget.id));
        } else {
            debug!(
                "Budget {} was already rolled over into {}",
                budget_id, outcome.budget.budget.id
            );
        }
        Ok(outcome.budget)
    }
}
