//! Database models for expenses.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use spendwise_core::expenses::{Expense, NewExpense};

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal, parse_tag};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: String,
    pub owner: String,
    pub amount: String,
    pub category: String,
    pub description: Option<String>,
    pub date: String,
    pub payment_method: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ExpenseDB {
    pub fn from_new(owner: String, new_expense: NewExpense) -> Self {
        let now = Utc::now().naive_utc();
        ExpenseDB {
            id: Uuid::new_v4().to_string(),
            owner,
            amount: new_expense.amount.to_string(),
            category: new_expense.category.as_str().to_string(),
            description: new_expense.description,
            date: format_date(new_expense.date),
            payment_method: new_expense.payment_method.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<ExpenseDB> for Expense {
    type Error = StorageError;

    fn try_from(db: ExpenseDB) -> Result<Self, Self::Error> {
        Ok(Expense {
            amount: parse_decimal("expenses.amount", &db.amount)?,
            category: parse_tag("expenses.category", &db.category)?,
            date: parse_date("expenses.date", &db.date)?,
            payment_method: parse_tag("expenses.payment_method", &db.payment_method)?,
            id: db.id,
            owner: db.owner,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
