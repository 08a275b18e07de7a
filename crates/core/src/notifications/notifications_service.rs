use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::notifications::notifications_model::BudgetNotification;
use crate::notifications::notifications_traits::{
    NotificationRepositoryTrait, NotificationServiceTrait,
};

pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        NotificationService { repository }
    }

    async fn set_read(&self, owner: &str, notification_id: &str, read: bool) -> Result<()> {
        let updated = self
            .repository
            .set_read(owner.to_string(), notification_id.to_string(), read)
            .await?;
        if updated == 0 {
            return Err(Error::not_found("Notification"));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn list_notifications(
        &self,
        owner: &str,
        unread_only: bool,
    ) -> Result<Vec<BudgetNotification>> {
        self.repository.list_notifications(owner, unread_only)
    }

    async fn mark_read(&self, owner: &str, notification_id: &str) -> Result<()> {
        self.set_read(owner, notification_id, true).await
    }

    async fn mark_unread(&self, owner: &str, notification_id: &str) -> Result<()> {
        self.set_read(owner, notification_id, false).await
    }

    async fn mark_all_read(&self, owner: &str) -> Result<usize> {
        self.repository.mark_all_read(owner.to_string()).await
    }
}
