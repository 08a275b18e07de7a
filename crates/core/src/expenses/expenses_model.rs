//! Expense domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{EXPENSE_DESCRIPTION_MAX_LEN, MIN_AMOUNT};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::decimal_utils::validate_amount_bounds;
use crate::utils::time_utils::{add_days, sub_days};

/// Fixed set of spending classifications shared by expenses and budget categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Housing,
    Utilities,
    Healthcare,
    Entertainment,
    Shopping,
    PersonalCare,
    Education,
    Travel,
    Miscellaneous,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 11] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transportation,
        ExpenseCategory::Housing,
        ExpenseCategory::Utilities,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::PersonalCare,
        ExpenseCategory::Education,
        ExpenseCategory::Travel,
        ExpenseCategory::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transportation => "TRANSPORTATION",
            ExpenseCategory::Housing => "HOUSING",
            ExpenseCategory::Utilities => "UTILITIES",
            ExpenseCategory::Healthcare => "HEALTHCARE",
            ExpenseCategory::Entertainment => "ENTERTAINMENT",
            ExpenseCategory::Shopping => "SHOPPING",
            ExpenseCategory::PersonalCare => "PERSONAL_CARE",
            ExpenseCategory::Education => "EDUCATION",
            ExpenseCategory::Travel => "TRAVEL",
            ExpenseCategory::Miscellaneous => "MISCELLANEOUS",
        }
    }

    /// Human readable label used in notification messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::PersonalCare => "Personal Care",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ExpenseCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Unknown expense category '{}'",
                    s
                )))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    BankTransfer,
    DigitalWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::DebitCard,
        PaymentMethod::CreditCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::DebitCard => "DEBIT_CARD",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::DigitalWallet => "DIGITAL_WALLET",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PaymentMethod::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "Unknown payment method '{}'",
                    s
                )))
            })
    }
}

/// Domain model representing a recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub owner: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new expense. The owner comes from the caller identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: ExpenseCategory,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
}

impl NewExpense {
    /// Validates the expense against `today` (no future-dated spending).
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.amount < MIN_AMOUNT {
            return Err(ValidationError::InvalidInput(
                "The amount cannot be negative or zero.".to_string(),
            )
            .into());
        }
        validate_amount_bounds("amount", self.amount)?;
        if self.date > today {
            return Err(ValidationError::FutureDate(self.date).into());
        }
        if let Some(description) = &self.description {
            if description.chars().count() > EXPENSE_DESCRIPTION_MAX_LEN {
                return Err(ValidationError::InvalidInput(format!(
                    "Description cannot exceed {} characters",
                    EXPENSE_DESCRIPTION_MAX_LEN
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Full replacement of an expense's editable fields.
pub type ExpenseUpdate = NewExpense;

/// Relative or custom date filters for listing expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFilter {
    PastWeek,
    PastMonth,
    Last3Months,
    /// Inclusive on both ends.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl ExpenseFilter {
    /// Parses the `filter`/`startDate`/`endDate` query triple.
    pub fn from_query(
        filter: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Option<Self>> {
        match filter {
            None | Some("") => Ok(None),
            Some("past_week") => Ok(Some(ExpenseFilter::PastWeek)),
            Some("past_month") => Ok(Some(ExpenseFilter::PastMonth)),
            Some("last_3_months") => Ok(Some(ExpenseFilter::Last3Months)),
            Some("custom") => match (start_date, end_date) {
                (Some(start), Some(end)) => Ok(Some(ExpenseFilter::Custom { start, end })),
                (None, _) => Err(ValidationError::MissingField("startDate".to_string()).into()),
                (_, None) => Err(ValidationError::MissingField("endDate".to_string()).into()),
            },
            Some(other) => Err(ValidationError::InvalidInput(format!(
                "Unknown expense filter '{}'",
                other
            ))
            .into()),
        }
    }

    /// Returns `(from, until)` bounds where `until` is exclusive.
    pub fn bounds(&self, today: NaiveDate) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
        match self {
            ExpenseFilter::PastWeek => Ok((Some(sub_days(today, 7)?), None)),
            ExpenseFilter::PastMonth => Ok((Some(sub_days(today, 30)?), None)),
            ExpenseFilter::Last3Months => Ok((Some(sub_days(today, 90)?), None)),
            ExpenseFilter::Custom { start, end } => Ok((Some(*start), Some(add_days(*end, 1)?))),
        }
    }
}
