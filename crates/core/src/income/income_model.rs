//! Income domain models.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::INCOME_DESCRIPTION_MAX_LEN;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::decimal_utils::validate_amount;
use crate::utils::time_utils::{add_days, add_months};

macro_rules! string_enum {
    ($name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ValidationError::InvalidInput(format!(
                        concat!("Unknown ", $what, " '{}'"),
                        other
                    ))
                    .into()),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomeType {
    Salary,
    Freelance,
    Business,
    Investments,
    Rental,
    Dividend,
    Interest,
    Bonus,
    Other,
}

string_enum!(IncomeType, "income type", {
    Salary => "SALARY",
    Freelance => "FREELANCE",
    Business => "BUSINESS",
    Investments => "INVESTMENTS",
    Rental => "RENTAL",
    Dividend => "DIVIDEND",
    Interest => "INTEREST",
    Bonus => "BONUS",
    Other => "OTHER",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    AUD,
    CAD,
    INR,
    CNY,
    CHF,
    SGD,
    NZD,
    HKD,
}

string_enum!(Currency, "currency", {
    USD => "USD",
    EUR => "EUR",
    GBP => "GBP",
    JPY => "JPY",
    AUD => "AUD",
    CAD => "CAD",
    INR => "INR",
    CNY => "CNY",
    CHF => "CHF",
    SGD => "SGD",
    NZD => "NZD",
    HKD => "HKD",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    OneTime,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Biannually,
    Annually,
}

string_enum!(Frequency, "frequency", {
    OneTime => "ONE_TIME",
    Daily => "DAILY",
    Weekly => "WEEKLY",
    Biweekly => "BIWEEKLY",
    Monthly => "MONTHLY",
    Quarterly => "QUARTERLY",
    Biannually => "BIANNUALLY",
    Annually => "ANNUALLY",
});

impl Frequency {
    /// Date of the next occurrence after `date`, `None` for one-time income.
    pub fn next_after(&self, date: NaiveDate) -> Result<Option<NaiveDate>> {
        let next = match self {
            Frequency::OneTime => return Ok(None),
            Frequency::Daily => add_days(date, 1)?,
            Frequency::Weekly => add_days(date, 7)?,
            Frequency::Biweekly => add_days(date, 14)?,
            Frequency::Monthly => add_months(date, 1)?,
            Frequency::Quarterly => add_months(date, 3)?,
            Frequency::Biannually => add_months(date, 6)?,
            Frequency::Annually => add_months(date, 12)?,
        };
        Ok(Some(next))
    }
}

/// Next expected occurrence of a recurring income.
pub fn next_expected_date(
    recurring: bool,
    frequency: Option<Frequency>,
    date: NaiveDate,
) -> Option<NaiveDate> {
    match (recurring, frequency) {
        (true, Some(frequency)) => frequency.next_after(date).ok().flatten(),
        _ => None,
    }
}

/// Domain model representing a recorded income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub owner: String,
    pub amount: Decimal,
    pub income_type: IncomeType,
    pub currency: Currency,
    pub date: NaiveDate,
    pub description: String,
    pub recurring: bool,
    pub frequency: Option<Frequency>,
    pub next_expected_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating an income record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub amount: Decimal,
    pub income_type: IncomeType,
    #[serde(default)]
    pub currency: Currency,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

impl NewIncome {
    pub fn validate(&self) -> Result<()> {
        validate_amount("amount", self.amount)?;
        if self.description.chars().count() > INCOME_DESCRIPTION_MAX_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Description cannot exceed {} characters",
                INCOME_DESCRIPTION_MAX_LEN
            ))
            .into());
        }
        if self.recurring && self.frequency.is_none() {
            return Err(ValidationError::MissingFrequency.into());
        }
        Ok(())
    }
}

pub type IncomeUpdate = NewIncome;

/// Sort order for income listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncomeOrdering {
    DateAsc,
    #[default]
    DateDesc,
    AmountAsc,
    AmountDesc,
    CreatedAtAsc,
    CreatedAtDesc,
}

impl FromStr for IncomeOrdering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "date" => Ok(IncomeOrdering::DateAsc),
            "-date" => Ok(IncomeOrdering::DateDesc),
            "amount" => Ok(IncomeOrdering::AmountAsc),
            "-amount" => Ok(IncomeOrdering::AmountDesc),
            "created_at" => Ok(IncomeOrdering::CreatedAtAsc),
            "-created_at" => Ok(IncomeOrdering::CreatedAtDesc),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown ordering '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Optional filters for listing income. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeQuery {
    pub income_type: Option<IncomeType>,
    pub recurring: Option<bool>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring match on the description.
    pub search: Option<String>,
    pub ordering: IncomeOrdering,
}

impl IncomeQuery {
    pub fn recurring_only() -> Self {
        IncomeQuery {
            recurring: Some(true),
            ..Default::default()
        }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        IncomeQuery {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        }
    }

    pub fn since(from: NaiveDate) -> Self {
        IncomeQuery {
            date_from: Some(from),
            ordering: IncomeOrdering::DateAsc,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTypeSummary {
    pub income_type: IncomeType,
    pub total: Decimal,
    pub average: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub unique_sources: usize,
    pub regular_income: Decimal,
    pub one_time_income: Decimal,
}
