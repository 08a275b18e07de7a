//! Database models for budget notifications.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use spendwise_core::notifications::{BudgetNotification, NewBudgetNotification};

use crate::errors::StorageError;
use crate::utils::parse_tag;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetNotificationDB {
    pub id: String,
    pub budget_category_id: String,
    pub notification_type: String,
    pub message: String,
    pub read: bool,
    /// Cleared once the condition clears so it can be reported again.
    pub dedup_key: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<NewBudgetNotification> for BudgetNotificationDB {
    fn from(new: NewBudgetNotification) -> Self {
        BudgetNotificationDB {
            id: Uuid::new_v4().to_string(),
            budget_category_id: new.budget_category_id,
            notification_type: new.notification_type.as_str().to_string(),
            message: new.message,
            read: false,
            dedup_key: Some(new.dedup_key),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<BudgetNotificationDB> for BudgetNotification {
    type Error = StorageError;

    fn try_from(db: BudgetNotificationDB) -> Result<Self, Self::Error> {
        Ok(BudgetNotification {
            notification_type: parse_tag(
                "budget_notifications.notification_type",
                &db.notification_type,
            )?,
            id: db.id,
            budget_category_id: db.budget_category_id,
            message: db.message,
            read: db.read,
            created_at: db.created_at,
        })
    }
}
