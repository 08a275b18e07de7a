use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Smallest positive amount accepted for limits, expenses and income.
pub const MIN_AMOUNT: Decimal = dec!(0.01);

/// Largest amount accepted for limits, expenses and income (ten digits, two of them cents).
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

/// Decimal places allowed on any money amount.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Floor applied to a category limit carried into a new budget generation.
pub const ROLLOVER_MIN_LIMIT: Decimal = dec!(0.01);

/// Default alert threshold (percent of the category limit).
pub const DEFAULT_ALERT_THRESHOLD: Decimal = dec!(80);

pub const MIN_ALERT_THRESHOLD: Decimal = dec!(1);
pub const MAX_ALERT_THRESHOLD: Decimal = dec!(100);

pub const BUDGET_NAME_MAX_LEN: usize = 100;
pub const EXPENSE_DESCRIPTION_MAX_LEN: usize = 255;
pub const INCOME_DESCRIPTION_MAX_LEN: usize = 100;

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
