use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use spendwise_core::budgets::{
    validate_allocation, validate_category_limit, validate_reallocation, Budget, BudgetCategory,
    BudgetCategoryUpdate, BudgetRepositoryTrait, BudgetUpdate, BudgetWithCategories, NewBudget,
    NewBudgetCategory, RolloverOutcome, RolloverPlan,
};
use spendwise_core::errors::ValidationError;
use spendwise_core::expenses::ExpenseCategory;
use spendwise_core::notifications::{NewBudgetNotification, NotificationType};
use spendwise_core::{Error, Result};

use super::model::{BudgetCategoryDB, BudgetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::notifications::insert_if_absent_in;
use crate::schema::{budget_categories, budgets};
use crate::utils::{chunk_for_sqlite, format_date};

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }
}

// === Query helpers usable on both pooled and writer connections ===

fn load_budget(conn: &mut SqliteConnection, owner: &str, budget_id: &str) -> Result<Option<Budget>> {
    let row = budgets::table
        .filter(budgets::id.eq(budget_id))
        .filter(budgets::owner.eq(owner))
        .select(BudgetDB::as_select())
        .first::<BudgetDB>(conn)
        .optional()
        .map_err(StorageError::from)?;
    Ok(row.map(Budget::try_from).transpose()?)
}

fn load_categories(conn: &mut SqliteConnection, budget_id: &str) -> Result<Vec<BudgetCategory>> {
    let rows = budget_categories::table
        .filter(budget_categories::budget_id.eq(budget_id))
        .order(budget_categories::created_at.asc())
        .select(BudgetCategoryDB::as_select())
        .load::<BudgetCategoryDB>(conn)
        .map_err(StorageError::from)?;
    categories_to_domain(rows)
}

fn load_owned_category(
    conn: &mut SqliteConnection,
    owner: &str,
    category_id: &str,
) -> Result<Option<(Budget, BudgetCategory)>> {
    let row = budget_categories::table
        .inner_join(budgets::table)
        .filter(budget_categories::id.eq(category_id))
        .filter(budgets::owner.eq(owner))
        .select((BudgetDB::as_select(), BudgetCategoryDB::as_select()))
        .first::<(BudgetDB, BudgetCategoryDB)>(conn)
        .optional()
        .map_err(StorageError::from)?;
    match row {
        Some((budget, category)) => Ok(Some((
            Budget::try_from(budget)?,
            BudgetCategory::try_from(category)?,
        ))),
        None => Ok(None),
    }
}

fn categories_to_domain(rows: Vec<BudgetCategoryDB>) -> Result<Vec<BudgetCategory>> {
    rows.into_iter()
        .map(|row| BudgetCategory::try_from(row).map_err(Error::from))
        .collect()
}

fn insert_category_row(conn: &mut SqliteConnection, row: &BudgetCategoryDB) -> Result<BudgetCategory> {
    let saved = diesel::insert_into(budget_categories::table)
        .values(row)
        .returning(BudgetCategoryDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?;
    Ok(BudgetCategory::try_from(saved)?)
}

fn find_successor(conn: &mut SqliteConnection, source_budget_id: &str) -> Result<Option<Budget>> {
    let row = budgets::table
        .filter(budgets::rolled_over_from.eq(source_budget_id))
        .select(BudgetDB::as_select())
        .first::<BudgetDB>(conn)
        .optional()
        .map_err(StorageError::from)?;
    Ok(row.map(Budget::try_from).transpose()?)
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn get_budget(&self, owner: &str, budget_id: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        load_budget(&mut conn, owner, budget_id)
    }

    fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budgets::table
            .filter(budgets::owner.eq(owner))
            .order((budgets::start_date.desc(), budgets::created_at.desc()))
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| Budget::try_from(row).map_err(Error::from))
            .collect()
    }

    fn get_categories(&self, budget_id: &str) -> Result<Vec<BudgetCategory>> {
        let mut conn = get_connection(&self.pool)?;
        load_categories(&mut conn, budget_id)
    }

    fn get_categories_for_budgets(&self, budget_ids: &[String]) -> Result<Vec<BudgetCategory>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows = Vec::new();
        for chunk in chunk_for_sqlite(budget_ids) {
            rows.extend(
                budget_categories::table
                    .filter(budget_categories::budget_id.eq_any(chunk))
                    .order(budget_categories::created_at.asc())
                    .select(BudgetCategoryDB::as_select())
                    .load::<BudgetCategoryDB>(&mut conn)
                    .map_err(StorageError::from)?,
            );
        }
        categories_to_domain(rows)
    }

    fn get_category(
        &self,
        owner: &str,
        category_id: &str,
    ) -> Result<Option<(Budget, BudgetCategory)>> {
        let mut conn = get_connection(&self.pool)?;
        load_owned_category(&mut conn, owner, category_id)
    }

    fn find_categories_for_expense(
        &self,
        owner: &str,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Result<Vec<(Budget, BudgetCategory)>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_categories::table
            .inner_join(budgets::table)
            .filter(budgets::owner.eq(owner))
            .filter(budgets::start_date.le(format_date(date)))
            .filter(budget_categories::category.eq(category.as_str()))
            .select((BudgetDB::as_select(), BudgetCategoryDB::as_select()))
            .load::<(BudgetDB, BudgetCategoryDB)>(&mut conn)
            .map_err(StorageError::from)?;
        let mut pairs = Vec::with_capacity(rows.len());
        for (budget, budget_category) in rows {
            pairs.push((
                Budget::try_from(budget)?,
                BudgetCategory::try_from(budget_category)?,
            ));
        }
        Ok(pairs)
    }

    async fn insert_budget(
        &self,
        owner: String,
        new_budget: NewBudget,
    ) -> Result<BudgetWithCategories> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetWithCategories> {
                new_budget.validate()?;
                let now = Utc::now().naive_utc();
                let row = BudgetDB {
                    id: uuid::Uuid::new_v4().to_string(),
                    owner,
                    name: new_budget.name.trim().to_string(),
                    period: new_budget.period.as_str().to_string(),
                    start_date: format_date(new_budget.start_date),
                    total_limit: new_budget.total_limit.to_string(),
                    rollover_enabled: new_budget.rollover_enabled,
                    rolled_over_from: None,
                    created_at: now,
                    updated_at: now,
                };
                let saved = diesel::insert_into(budgets::table)
                    .values(&row)
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                let budget = Budget::try_from(saved)?;

                let mut categories = Vec::with_capacity(new_budget.categories.len());
                for new_category in &new_budget.categories {
                    let category_row = BudgetCategoryDB::from_new(&budget.id, new_category);
                    categories.push(insert_category_row(conn, &category_row)?);
                }
                Ok(BudgetWithCategories { budget, categories })
            })
            .await
    }

    async fn update_budget(
        &self,
        owner: String,
        budget_id: String,
        update: BudgetUpdate,
    ) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                update.validate()?;
                let existing = load_budget(conn, &owner, &budget_id)?
                    .ok_or_else(|| Error::not_found("Budget"))?;
                let categories = load_categories(conn, &existing.id)?;
                for category in &categories {
                    validate_category_limit(category.limit, update.total_limit)?;
                }
                validate_allocation(update.total_limit, categories.iter().map(|c| c.limit))?;

                let saved = diesel::update(budgets::table.find(&existing.id))
                    .set((
                        budgets::name.eq(update.name.trim()),
                        budgets::period.eq(update.period.as_str()),
                        budgets::start_date.eq(format_date(update.start_date)),
                        budgets::total_limit.eq(update.total_limit.to_string()),
                        budgets::rollover_enabled.eq(update.rollover_enabled),
                        budgets::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Budget::try_from(saved)?)
            })
            .await
    }

    async fn delete_budget(&self, owner: String, budget_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    budgets::table
                        .filter(budgets::id.eq(budget_id))
                        .filter(budgets::owner.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    async fn insert_category(
        &self,
        owner: String,
        budget_id: String,
        new_category: NewBudgetCategory,
    ) -> Result<BudgetCategory> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetCategory> {
                let budget = load_budget(conn, &owner, &budget_id)?
                    .ok_or_else(|| Error::not_found("Budget"))?;
                let siblings = load_categories(conn, &budget.id)?;
                if siblings.iter().any(|c| c.category == new_category.category) {
                    return Err(ValidationError::DuplicateCategory(
                        new_category.category.as_str().to_string(),
                    )
                    .into());
                }
                new_category.validate(budget.total_limit)?;
                validate_allocation(
                    budget.total_limit,
                    siblings
                        .iter()
                        .map(|c| c.limit)
                        .chain(std::iter::once(new_category.limit)),
                )?;

                let row = BudgetCategoryDB::from_new(&budget.id, &new_category);
                insert_category_row(conn, &row)
            })
            .await
    }

    async fn update_category(
        &self,
        owner: String,
        category_id: String,
        update: BudgetCategoryUpdate,
    ) -> Result<BudgetCategory> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetCategory> {
                let (budget, current) = load_owned_category(conn, &owner, &category_id)?
                    .ok_or_else(|| Error::not_found("Budget category"))?;
                update.validate()?;
                let siblings = load_categories(conn, &budget.id)?;
                validate_reallocation(
                    budget.total_limit,
                    current.limit,
                    update.limit,
                    siblings
                        .iter()
                        .filter(|c| c.id != current.id)
                        .map(|c| c.limit),
                )?;

                let saved = diesel::update(budget_categories::table.find(&current.id))
                    .set((
                        budget_categories::limit_amount.eq(update.limit.to_string()),
                        budget_categories::alert_threshold.eq(update.alert_threshold.to_string()),
                        budget_categories::notification_enabled.eq(update.notification_enabled),
                        budget_categories::needs_review.eq(false),
                        budget_categories::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(BudgetCategoryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(BudgetCategory::try_from(saved)?)
            })
            .await
    }

    async fn delete_category(&self, owner: String, category_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                if load_owned_category(conn, &owner, &category_id)?.is_none() {
                    return Ok(0);
                }
                Ok(diesel::delete(budget_categories::table.find(&category_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn apply_rollover(&self, plan: RolloverPlan) -> Result<RolloverOutcome> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<RolloverOutcome> {
                if load_budget(conn, &plan.owner, &plan.source_budget_id)?.is_none() {
                    return Err(Error::not_found("Budget"));
                }
                if let Some(budget) = find_successor(conn, &plan.source_budget_id)? {
                    debug!(
                        "Rollover of {} already produced {}",
                        plan.source_budget_id, budget.id
                    );
                    let categories = load_categories(conn, &budget.id)?;
                    return Ok(RolloverOutcome {
                        budget: BudgetWithCategories { budget, categories },
                        created: false,
                    });
                }

                let row = BudgetDB::successor(&plan);
                let saved = diesel::insert_into(budgets::table)
                    .values(&row)
                    .returning(BudgetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                let budget = Budget::try_from(saved)?;

                let mut categories = Vec::with_capacity(plan.categories.len());
                for carried in &plan.categories {
                    let category_row = BudgetCategoryDB::from_carried(&budget.id, carried);
                    let category = insert_category_row(conn, &category_row)?;
                    if let Some(message) = &carried.reset_message {
                        insert_if_absent_in(
                            conn,
                            NewBudgetNotification::new(
                                &category.id,
                                NotificationType::BudgetReset,
                                message.clone(),
                            ),
                        )?;
                    }
                    categories.push(category);
                }

                Ok(RolloverOutcome {
                    budget: BudgetWithCategories { budget, categories },
                    created: true,
                })
            })
            .await
    }
}
