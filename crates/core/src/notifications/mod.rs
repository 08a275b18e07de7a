//! Notifications module - budget alerts and their read state.

mod alert_service;
mod notifications_model;
mod notifications_service;
mod notifications_traits;

#[cfg(test)]
mod alert_service_tests;

pub use alert_service::{cleared_alerts, pending_alerts, BudgetAlertService};
pub use notifications_model::{
    dedup_key, released_keys, BudgetNotification, NewBudgetNotification, NotificationType,
};
pub use notifications_service::NotificationService;
pub use notifications_traits::{
    BudgetAlertServiceTrait, NotificationRepositoryTrait, NotificationServiceTrait,
};
