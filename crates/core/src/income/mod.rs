//! Income module - income records and their summaries.

mod income_model;
mod income_service;
mod income_traits;


pub use income_model::{
    next_expected_date, Currency, Frequency, Income, IncomeOrdering, IncomeQuery, IncomeType,
    IncomeTypeSummary, IncomeUpdate, MonthlyIncome, NewIncome,
};
pub use income_service::{summarize_by_month, summarize_by_type, IncomeService};
pub use income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
