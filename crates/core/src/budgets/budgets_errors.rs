use thiserror::Error;

/// Budget-specific business rule rejections.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Rollover not enabled for budget {0}")]
    RolloverDisabled(String),
}
