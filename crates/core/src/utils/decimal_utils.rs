//! Money amount checks and overflow-safe arithmetic.

use rust_decimal::Decimal;

use crate::constants::{AMOUNT_DECIMAL_PLACES, MAX_AMOUNT, MIN_AMOUNT};
use crate::errors::{Result, ValidationError};

/// Checks `MIN_AMOUNT <= amount <= MAX_AMOUNT` with at most two decimal places.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount < MIN_AMOUNT {
        return Err(ValidationError::AmountTooSmall {
            field: field.to_string(),
            min: MIN_AMOUNT,
        }
        .into());
    }
    validate_amount_bounds(field, amount)
}

/// Upper bound and scale only. Callers report the lower bound themselves.
pub fn validate_amount_bounds(field: &str, amount: Decimal) -> Result<()> {
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge {
            field: field.to_string(),
            max: MAX_AMOUNT,
        }
        .into());
    }
    if amount.normalize().scale() > AMOUNT_DECIMAL_PLACES {
        return Err(ValidationError::TooManyDecimalPlaces {
            field: field.to_string(),
            places: AMOUNT_DECIMAL_PLACES,
        }
        .into());
    }
    Ok(())
}

pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| ValidationError::AmountOverflow(format!("{} + {}", a, b)).into())
}

pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| ValidationError::AmountOverflow(format!("{} * {}", a, b)).into())
}

pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| checked_add(total, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_are_bounded_and_limited_to_cents() {
        assert!(validate_amount("amount", dec!(0.01)).is_ok());
        assert!(validate_amount("amount", dec!(99999999.99)).is_ok());
        assert!(validate_amount("amount", dec!(12.50)).is_ok());
        assert!(validate_amount("amount", dec!(12.500)).is_ok());

        assert!(matches!(
            validate_amount("amount", dec!(0)),
            Err(Error::Validation(ValidationError::AmountTooSmall { .. }))
        ));
        assert!(matches!(
            validate_amount("amount", dec!(100000000)),
            Err(Error::Validation(ValidationError::AmountTooLarge { .. }))
        ));
        assert!(matches!(
            validate_amount("amount", Decimal::from_i128_with_scale(10_i128.pow(28), 0)),
            Err(Error::Validation(ValidationError::AmountTooLarge { .. }))
        ));
        assert!(matches!(
            validate_amount("amount", dec!(1.005)),
            Err(Error::Validation(ValidationError::TooManyDecimalPlaces { .. }))
        ));
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert!(matches!(
            checked_mul(Decimal::MAX, dec!(100)),
            Err(Error::Validation(ValidationError::AmountOverflow(_)))
        ));
        assert!(checked_sum([Decimal::MAX, dec!(1)]).is_err());
        assert_eq!(checked_sum([dec!(1.25), dec!(2.75)]).unwrap(), dec!(4));
    }
}
