use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ThresholdReached,
    LimitExceeded,
    BudgetReset,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::ThresholdReached => "THRESHOLD_REACHED",
            NotificationType::LimitExceeded => "LIMIT_EXCEEDED",
            NotificationType::BudgetReset => "BUDGET_RESET",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "THRESHOLD_REACHED" => Ok(NotificationType::ThresholdReached),
            "LIMIT_EXCEEDED" => Ok(NotificationType::LimitExceeded),
            "BUDGET_RESET" => Ok(NotificationType::BudgetReset),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown notification type '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Alert attached to one category limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetNotification {
    pub id: String,
    pub budget_category_id: String,
    pub notification_type: NotificationType,
    pub message: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetNotification {
    pub budget_category_id: String,
    pub notification_type: NotificationType,
    pub message: String,
    pub dedup_key: String,
}

impl NewBudgetNotification {
    pub fn new(
        budget_category_id: impl Into<String>,
        notification_type: NotificationType,
        message: impl Into<String>,
    ) -> Self {
        let budget_category_id = budget_category_id.into();
        NewBudgetNotification {
            dedup_key: dedup_key(&budget_category_id, notification_type),
            budget_category_id,
            notification_type,
            message: message.into(),
        }
    }
}

/// One open notification per category generation and type.
pub fn dedup_key(budget_category_id: &str, notification_type: NotificationType) -> String {
    format!("{}:{}", budget_category_id, notification_type.as_str())
}

/// Dedup keys to release for the given types of one category limit.
pub fn released_keys(budget_category_id: &str, types: &[NotificationType]) -> Vec<String> {
    types
        .iter()
        .map(|notification_type| dedup_key(budget_category_id, *notification_type))
        .collect()
}
