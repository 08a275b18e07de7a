//! Database models for income records.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use spendwise_core::income::{next_expected_date, Income, NewIncome};

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal, parse_tag};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::incomes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncomeDB {
    pub id: String,
    pub owner: String,
    pub amount: String,
    pub income_type: String,
    pub currency: String,
    pub date: String,
    pub description: String,
    pub recurring: bool,
    pub frequency: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl IncomeDB {
    pub fn from_new(owner: String, new_income: NewIncome) -> Self {
        let now = Utc::now().naive_utc();
        IncomeDB {
            id: Uuid::new_v4().to_string(),
            owner,
            amount: new_income.amount.to_string(),
            income_type: new_income.income_type.as_str().to_string(),
            currency: new_income.currency.as_str().to_string(),
            date: format_date(new_income.date),
            description: new_income.description,
            recurring: new_income.recurring,
            frequency: new_income.frequency.map(|f| f.as_str().to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<IncomeDB> for Income {
    type Error = StorageError;

    fn try_from(db: IncomeDB) -> Result<Self, Self::Error> {
        let date = parse_date("incomes.date", &db.date)?;
        let frequency = db
            .frequency
            .as_deref()
            .map(|f| parse_tag("incomes.frequency", f))
            .transpose()?;
        Ok(Income {
            amount: parse_decimal("incomes.amount", &db.amount)?,
            income_type: parse_tag("incomes.income_type", &db.income_type)?,
            currency: parse_tag("incomes.currency", &db.currency)?,
            next_expected_date: next_expected_date(db.recurring, frequency, date),
            date,
            frequency,
            id: db.id,
            owner: db.owner,
            description: db.description,
            recurring: db.recurring,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
