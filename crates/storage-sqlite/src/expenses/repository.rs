use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use spendwise_core::expenses::{
    Expense, ExpenseCategory, ExpenseRepositoryTrait, ExpenseUpdate, NewExpense,
};
use spendwise_core::utils::decimal_utils::checked_add;
use spendwise_core::utils::time_utils::DateWindow;
use spendwise_core::{Error, Result};

use super::model::ExpenseDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::expenses;
use crate::utils::{format_date, parse_decimal};

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ExpenseRepository { pool, writer }
    }
}

fn to_domain(rows: Vec<ExpenseDB>) -> Result<Vec<Expense>> {
    rows.into_iter()
        .map(|row| Expense::try_from(row).map_err(Error::from))
        .collect()
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    fn get_expense(&self, owner: &str, expense_id: &str) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let row = expenses::table
            .filter(expenses::id.eq(expense_id))
            .filter(expenses::owner.eq(owner))
            .select(ExpenseDB::as_select())
            .first::<ExpenseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Expense::try_from).transpose()?)
    }

    fn list_expenses(
        &self,
        owner: &str,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = expenses::table
            .filter(expenses::owner.eq(owner))
            .into_boxed();
        if let Some(from) = from {
            query = query.filter(expenses::date.ge(format_date(from)));
        }
        if let Some(until) = until {
            query = query.filter(expenses::date.lt(format_date(until)));
        }
        let rows = query
            .order((expenses::date.desc(), expenses::created_at.desc()))
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn sum_amount(
        &self,
        owner: &str,
        category: Option<ExpenseCategory>,
        window: &DateWindow,
    ) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = expenses::table
            .filter(expenses::owner.eq(owner))
            .filter(expenses::date.ge(format_date(window.start)))
            .filter(expenses::date.lt(format_date(window.end)))
            .select(expenses::amount)
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(expenses::category.eq(category.as_str()));
        }
        let amounts = query
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;

        let mut total = Decimal::ZERO;
        for amount in &amounts {
            total = checked_add(total, parse_decimal("expenses.amount", amount)?)?;
        }
        Ok(total)
    }

    async fn insert_expense(&self, owner: String, new_expense: NewExpense) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let row = ExpenseDB::from_new(owner, new_expense);
                let saved = diesel::insert_into(expenses::table)
                    .values(&row)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Expense::try_from(saved)?)
            })
            .await
    }

    async fn update_expense(
        &self,
        owner: String,
        expense_id: String,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let saved = diesel::update(
                    expenses::table
                        .filter(expenses::id.eq(&expense_id))
                        .filter(expenses::owner.eq(&owner)),
                )
                .set((
                    expenses::amount.eq(update.amount.to_string()),
                    expenses::category.eq(update.category.as_str()),
                    expenses::description.eq(update.description),
                    expenses::date.eq(format_date(update.date)),
                    expenses::payment_method.eq(update.payment_method.as_str()),
                    expenses::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(ExpenseDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::not_found("Expense"))?;
                Ok(Expense::try_from(saved)?)
            })
            .await
    }

    async fn delete_expense(&self, owner: String, expense_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    expenses::table
                        .filter(expenses::id.eq(expense_id))
                        .filter(expenses::owner.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use rust_decimal_macros::dec;
    use spendwise_core::expenses::PaymentMethod;
    use spendwise_core::errors::ValidationError;
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn setup() -> (ExpenseRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (ExpenseRepository::new(pool, writer), temp_dir)
    }

    async fn seed(
        repo: &ExpenseRepository,
        owner: &str,
        category: ExpenseCategory,
        amount: Decimal,
        date: NaiveDate,
    ) -> Expense {
        repo.insert_expense(
            owner.to_string(),
            NewExpense {
                amount,
                category,
                description: None,
                date,
                payment_method: PaymentMethod::DebitCard,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn sum_amount_uses_half_open_window() {
        let (repo, _dir) = setup().await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(100), d(2024, 1, 15)).await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(50.25), d(2024, 2, 14)).await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(999), d(2024, 2, 15)).await;
        seed(&repo, "user-1", ExpenseCategory::Travel, dec!(70), d(2024, 1, 20)).await;
        seed(&repo, "user-2", ExpenseCategory::Food, dec!(500), d(2024, 1, 20)).await;

        let window = DateWindow::new(d(2024, 1, 15), d(2024, 2, 15));
        let food = repo
            .sum_amount("user-1", Some(ExpenseCategory::Food), &window)
            .unwrap();
        assert_eq!(food, dec!(150.25));

        let all = repo.sum_amount("user-1", None, &window).unwrap();
        assert_eq!(all, dec!(220.25));
    }

    #[tokio::test]
    async fn sum_amount_reports_overflow() {
        let (repo, _dir) = setup().await;
        seed(&repo, "user-1", ExpenseCategory::Food, Decimal::MAX, d(2024, 1, 20)).await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(1), d(2024, 1, 21)).await;

        let window = DateWindow::new(d(2024, 1, 15), d(2024, 2, 15));
        let result = repo.sum_amount("user-1", Some(ExpenseCategory::Food), &window);
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::AmountOverflow(_)))
        ));
    }

    #[tokio::test]
    async fn updates_and_deletes_are_owner_scoped() {
        let (repo, _dir) = setup().await;
        let expense = seed(&repo, "user-1", ExpenseCategory::Food, dec!(12), d(2024, 3, 1)).await;

        let update = NewExpense {
            amount: dec!(15),
            category: ExpenseCategory::Food,
            description: Some("lunch".to_string()),
            date: d(2024, 3, 1),
            payment_method: PaymentMethod::Cash,
        };
        let foreign = repo
            .update_expense("user-2".to_string(), expense.id.clone(), update.clone())
            .await;
        assert!(matches!(foreign, Err(Error::NotFound(_))));

        let updated = repo
            .update_expense("user-1".to_string(), expense.id.clone(), update)
            .await
            .unwrap();
        assert_eq!(updated.amount, dec!(15));
        assert_eq!(updated.payment_method, PaymentMethod::Cash);

        assert_eq!(
            repo.delete_expense("user-2".to_string(), expense.id.clone())
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            repo.delete_expense("user-1".to_string(), expense.id.clone())
                .await
                .unwrap(),
            1
        );
        assert!(repo.get_expense("user-1", &expense.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_newest_first_within_bounds() {
        let (repo, _dir) = setup().await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(1), d(2024, 1, 1)).await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(2), d(2024, 1, 10)).await;
        seed(&repo, "user-1", ExpenseCategory::Food, dec!(3), d(2024, 1, 20)).await;

        let listed = repo
            .list_expenses("user-1", Some(d(2024, 1, 5)), Some(d(2024, 1, 21)))
            .unwrap();
        let amounts: Vec<Decimal> = listed.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![dec!(3), dec!(2)]);
    }
}
