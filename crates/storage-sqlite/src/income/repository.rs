use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendwise_core::income::{
    Income, IncomeOrdering, IncomeQuery, IncomeRepositoryTrait, IncomeUpdate, NewIncome,
};
use spendwise_core::{Error, Result};

use super::model::IncomeDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::incomes;
use crate::utils::format_date;

pub struct IncomeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl IncomeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        IncomeRepository { pool, writer }
    }
}

/// Escapes `LIKE` wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl IncomeRepositoryTrait for IncomeRepository {
    fn get_income(&self, owner: &str, income_id: &str) -> Result<Option<Income>> {
        let mut conn = get_connection(&self.pool)?;
        let row = incomes::table
            .filter(incomes::id.eq(income_id))
            .filter(incomes::owner.eq(owner))
            .select(IncomeDB::as_select())
            .first::<IncomeDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Income::try_from).transpose()?)
    }

    fn list_incomes(&self, owner: &str, query: &IncomeQuery) -> Result<Vec<Income>> {
        let mut conn = get_connection(&self.pool)?;
        let mut sql = incomes::table
            .filter(incomes::owner.eq(owner))
            .select(IncomeDB::as_select())
            .into_boxed();

        if let Some(income_type) = query.income_type {
            sql = sql.filter(incomes::income_type.eq(income_type.as_str()));
        }
        if let Some(recurring) = query.recurring {
            sql = sql.filter(incomes::recurring.eq(recurring));
        }
        if let Some(date) = query.date {
            sql = sql.filter(incomes::date.eq(format_date(date)));
        }
        if let Some(from) = query.date_from {
            sql = sql.filter(incomes::date.ge(format_date(from)));
        }
        if let Some(to) = query.date_to {
            sql = sql.filter(incomes::date.le(format_date(to)));
        }
        if let Some(term) = query.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                sql = sql.filter(incomes::description.like(like_pattern(term)).escape('\\'));
            }
        }

        // Amounts are stored as text, so amount ordering happens after decoding.
        sql = match query.ordering {
            IncomeOrdering::DateAsc => sql.order((incomes::date.asc(), incomes::created_at.asc())),
            IncomeOrdering::CreatedAtAsc => sql.order(incomes::created_at.asc()),
            IncomeOrdering::CreatedAtDesc => sql.order(incomes::created_at.desc()),
            _ => sql.order((incomes::date.desc(), incomes::created_at.desc())),
        };

        let rows = sql
            .load::<IncomeDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut records = rows
            .into_iter()
            .map(|row| Income::try_from(row).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        match query.ordering {
            IncomeOrdering::AmountAsc => records.sort_by(|a, b| a.amount.cmp(&b.amount)),
            IncomeOrdering::AmountDesc => {
                records.sort_by(|a, b| match b.amount.cmp(&a.amount) {
                    Ordering::Equal => b.date.cmp(&a.date),
                    other => other,
                })
            }
            _ => {}
        }
        Ok(records)
    }

    async fn insert_income(&self, owner: String, new_income: NewIncome) -> Result<Income> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Income> {
                let row = IncomeDB::from_new(owner, new_income);
                let saved = diesel::insert_into(incomes::table)
                    .values(&row)
                    .returning(IncomeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Income::try_from(saved)?)
            })
            .await
    }

    async fn update_income(
        &self,
        owner: String,
        income_id: String,
        update: IncomeUpdate,
    ) -> Result<Income> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Income> {
                let saved = diesel::update(
                    incomes::table
                        .filter(incomes::id.eq(&income_id))
                        .filter(incomes::owner.eq(&owner)),
                )
                .set((
                    incomes::amount.eq(update.amount.to_string()),
                    incomes::income_type.eq(update.income_type.as_str()),
                    incomes::currency.eq(update.currency.as_str()),
                    incomes::date.eq(format_date(update.date)),
                    incomes::description.eq(update.description),
                    incomes::recurring.eq(update.recurring),
                    incomes::frequency.eq(update.frequency.map(|f| f.as_str())),
                    incomes::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(IncomeDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| Error::not_found("Income"))?;
                Ok(Income::try_from(saved)?)
            })
            .await
    }

    async fn delete_income(&self, owner: String, income_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    incomes::table
                        .filter(incomes::id.eq(income_id))
                        .filter(incomes::owner.eq(owner)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
