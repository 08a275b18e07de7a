use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::expenses::expenses_model::{Expense, ExpenseFilter, ExpenseUpdate, NewExpense};
use crate::expenses::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use crate::utils::time_utils::today;

pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl ExpenseService {
    pub fn new(
        repository: Arc<dyn ExpenseRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        ExpenseService {
            repository,
            event_sink,
        }
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    fn get_expense(&self, owner: &str, expense_id: &str) -> Result<Expense> {
        self.repository
            .get_expense(owner, expense_id)?
            .ok_or_else(|| Error::not_found("Expense"))
    }

    fn list_expenses(&self, owner: &str, filter: Option<ExpenseFilter>) -> Result<Vec<Expense>> {
        let (from, until) = match filter {
            Some(filter) => filter.bounds(today())?,
            None => (None, None),
        };
        self.repository.list_expenses(owner, from, until)
    }

    async fn create_expense(&self, owner: &str, new_expense: NewExpense) -> Result<Expense> {
        new_expense.validate(today())?;
        let expense = self
            .repository
            .insert_expense(owner.to_string(), new_expense)
            .await?;
        debug!("Created expense {} for {}", expense.id, owner);

        self.event_sink.emit(DomainEvent::expenses_changed(
            owner,
            vec![expense.category],
            vec![expense.date],
        ));
        Ok(expense)
    }

    async fn update_expense(
        &self,
        owner: &str,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        update.validate(today())?;
        let previous = self.get_expense(owner, expense_id)?;
        let expense = self
            .repository
            .update_expense(owner.to_string(), expense_id.to_string(), update)
            .await?;

        let mut categories = vec![previous.category];
        if expense.category != previous.category {
            categories.push(expense.category);
        }
        let mut dates = vec![previous.date];
        if expense.date != previous.date {
            dates.push(expense.date);
        }
        self.event_sink
            .emit(DomainEvent::expenses_changed(owner, categories, dates));
        Ok(expense)
    }

    async fn delete_expense(&self, owner: &str, expense_id: &str) -> Result<()> {
        let previous = self.get_expense(owner, expense_id)?;
        let deleted = self
            .repository
            .delete_expense(owner.to_string(), expense_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Expense"));
        }
        self.event_sink.emit(DomainEvent::expenses_changed(
            owner,
            vec![previous.category],
            vec![previous.date],
        ));
        Ok(())
    }
}
