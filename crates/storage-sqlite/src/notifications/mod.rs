//! SQLite storage implementation for budget notifications.

mod model;
mod repository;

pub use model::BudgetNotificationDB;
pub(crate) use repository::insert_if_absent_in;
pub use repository::NotificationRepository;
