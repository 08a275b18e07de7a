//! Database models for budgets and their category limits.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use spendwise_core::budgets::{
    Budget, BudgetCategory, CarriedCategory, NewBudgetCategory, RolloverPlan,
};

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_decimal, parse_tag};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub period: String,
    pub start_date: String,
    pub total_limit: String,
    pub rollover_enabled: bool,
    pub rolled_over_from: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(BudgetDB, foreign_key = budget_id))]
#[diesel(table_name = crate::schema::budget_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetCategoryDB {
    pub id: String,
    pub budget_id: String,
    pub category: String,
    pub limit_amount: String,
    pub alert_threshold: String,
    pub notification_enabled: bool,
    pub needs_review: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetCategoryDB {
    pub fn from_new(budget_id: &str, new_category: &NewBudgetCategory) -> Self {
        let now = Utc::now().naive_utc();
        BudgetCategoryDB {
            id: Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            category: new_category.category.as_str().to_string(),
            limit_amount: new_category.limit.to_string(),
            alert_threshold: new_category.alert_threshold.to_string(),
            notification_enabled: new_category.notification_enabled,
            needs_review: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_carried(budget_id: &str, carried: &CarriedCategory) -> Self {
        let now = Utc::now().naive_utc();
        BudgetCategoryDB {
            id: Uuid::new_v4().to_string(),
            budget_id: budget_id.to_string(),
            category: carried.category.as_str().to_string(),
            limit_amount: carried.limit.to_string(),
            alert_threshold: carried.alert_threshold.to_string(),
            notification_enabled: carried.notification_enabled,
            needs_review: carried.needs_review,
            created_at: now,
            updated_at: now,
        }
    }
}

impl BudgetDB {
    pub fn successor(plan: &RolloverPlan) -> Self {
        let now = Utc::now().naive_utc();
        BudgetDB {
            id: Uuid::new_v4().to_string(),
            owner: plan.owner.clone(),
            name: plan.name.clone(),
            period: plan.period.as_str().to_string(),
            start_date: format_date(plan.start_date),
            total_limit: plan.total_limit.to_string(),
            rollover_enabled: plan.rollover_enabled,
            rolled_over_from: Some(plan.source_budget_id.clone()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<BudgetDB> for Budget {
    type Error = StorageError;

    fn try_from(db: BudgetDB) -> Result<Self, Self::Error> {
        Ok(Budget {
            period: parse_tag("budgets.period", &db.period)?,
            start_date: parse_date("budgets.start_date", &db.start_date)?,
            total_limit: parse_decimal("budgets.total_limit", &db.total_limit)?,
            id: db.id,
            owner: db.owner,
            name: db.name,
            rollover_enabled: db.rollover_enabled,
            rolled_over_from: db.rolled_over_from,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<BudgetCategoryDB> for BudgetCategory {
    type Error = StorageError;

    fn try_from(db: BudgetCategoryDB) -> Result<Self, Self::Error> {
        Ok(BudgetCategory {
            category: parse_tag("budget_categories.category", &db.category)?,
            limit: parse_decimal("budget_categories.limit_amount", &db.limit_amount)?,
            alert_threshold: parse_decimal(
                "budget_categories.alert_threshold",
                &db.alert_threshold,
            )?,
            id: db.id,
            budget_id: db.budget_id,
            notification_enabled: db.notification_enabled,
            needs_review: db.needs_review,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
