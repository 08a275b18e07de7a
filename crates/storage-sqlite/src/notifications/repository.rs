use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use spendwise_core::notifications::{
    BudgetNotification, NewBudgetNotification, NotificationRepositoryTrait,
};
use spendwise_core::{Error, Result};

use super::model::BudgetNotificationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{budget_categories, budget_notifications, budgets};

/// Inserts `notification` unless its dedup key is taken. Must run on the
/// writer connection so it can share a transaction with other writes.
pub(crate) fn insert_if_absent_in(
    conn: &mut SqliteConnection,
    notification: NewBudgetNotification,
) -> Result<Option<BudgetNotification>> {
    let row = BudgetNotificationDB::from(notification);
    let inserted = diesel::insert_into(budget_notifications::table)
        .values(&row)
        .on_conflict(budget_notifications::dedup_key)
        .do_nothing()
        .execute(conn)
        .map_err(StorageError::from)?;
    if inserted == 0 {
        return Ok(None);
    }
    Ok(Some(BudgetNotification::try_from(row)?))
}

/// Ids of every notification whose category belongs to one of the owner's budgets.
fn owned_ids(conn: &mut SqliteConnection, owner: &str) -> Result<Vec<String>> {
    budget_notifications::table
        .inner_join(budget_categories::table.inner_join(budgets::table))
        .filter(budgets::owner.eq(owner))
        .select(budget_notifications::id)
        .load::<String>(conn)
        .map_err(|e| StorageError::from(e).into())
}

pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        NotificationRepository { pool, writer }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn list_notifications(
        &self,
        owner: &str,
        unread_only: bool,
    ) -> Result<Vec<BudgetNotification>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = budget_notifications::table
            .inner_join(budget_categories::table.inner_join(budgets::table))
            .filter(budgets::owner.eq(owner))
            .select(BudgetNotificationDB::as_select())
            .into_boxed();
        if unread_only {
            query = query.filter(budget_notifications::read.eq(false));
        }
        let rows = query
            .order(budget_notifications::created_at.desc())
            .load::<BudgetNotificationDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|row| BudgetNotification::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn insert_if_absent(
        &self,
        notification: NewBudgetNotification,
    ) -> Result<Option<BudgetNotification>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| insert_if_absent_in(conn, notification))
            .await
    }

    async fn release_dedup_keys(&self, keys: Vec<String>) -> Result<usize> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::update(
                    budget_notifications::table
                        .filter(budget_notifications::dedup_key.eq_any(&keys)),
                )
                .set(budget_notifications::dedup_key.eq(None::<String>))
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    async fn set_read(&self, owner: String, notification_id: String, read: bool) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let owned = budget_notifications::table
                    .inner_join(budget_categories::table.inner_join(budgets::table))
                    .filter(budget_notifications::id.eq(&notification_id))
                    .filter(budgets::owner.eq(&owner))
                    .select(budget_notifications::id)
                    .first::<String>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if owned.is_none() {
                    return Ok(0);
                }
                Ok(diesel::update(budget_notifications::table.find(&notification_id))
                    .set(budget_notifications::read.eq(read))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn mark_all_read(&self, owner: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let owned = owned_ids(conn, &owner)?;
                let mut updated = 0;
                for chunk in crate::utils::chunk_for_sqlite(&owned) {
                    updated += diesel::update(
                        budget_notifications::table
                            .filter(budget_notifications::id.eq_any(chunk))
                            .filter(budget_notifications::read.eq(false)),
                    )
                    .set(budget_notifications::read.eq(true))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(updated)
            })
            .await
    }
}
